/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础操作、检查点/回滚 + forward
 * - mode.rs: train/eval
 * - node_builders.rs: new_*_node
 * - serialization.rs: save_params/load_params 底层参数序列化
 * - model_io.rs: save_model/load_model 高层模型 I/O
 * - describe.rs: describe/summary
 * - visualization.rs: DOT 可视化
 */

mod core;
mod describe;
mod mode;
mod model_io;
mod node_builders;
mod serialization;
mod visualization;

use super::types::LayerGroup;
use crate::nn::nodes::NodeHandle;
use crate::nn::NodeId;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构，需要直接操作节点时可通过 `graph.inner()` 访问。
///
/// 节点 ID 单调递增，而节点只能引用已存在的节点作为父节点，
/// 因此按 ID 升序即为一个合法的拓扑序。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 正向边：parent_id -> child_ids（父节点指向子节点）
    pub(in crate::nn::graph) forward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 反向边：child_id -> parent_ids（子节点指向父节点）
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<NodeId>>,
    pub(in crate::nn::graph) next_id: u64,
    pub(in crate::nn::graph) is_eval_mode: bool,
    /// 图级别的随机数生成器（用于参数初始化、dropout 等）
    /// None 表示使用非确定性的熵源
    pub(in crate::nn::graph) rng: Option<StdRng>,
    /// 层分组信息（用于可视化）
    pub(in crate::nn::graph) layer_groups: Vec<LayerGroup>,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
