/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 计算图节点：句柄（NodeHandle）+ 具体节点类型（raw_node）
 */

mod node_handle;
pub(crate) mod raw_node;

pub use node_handle::NodeId;
pub(crate) use node_handle::NodeHandle;
