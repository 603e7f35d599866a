/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : Graph 模块的类型定义
 */

use crate::nn::NodeId;

/// 分组类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// 层级分组（如 Dense、Conv2d）
    Layer,
    /// 模块级分组（如残差单元、整个 stage）
    Block,
}

/// 分组信息（用于可视化时将属于同一层/模块的节点框在一起）
#[derive(Debug, Clone)]
pub struct LayerGroup {
    /// 层名称（如 "Inpt_conv", "Stg2_Blk1"）
    pub name: String,
    /// 层类型（如 "Conv2d", "ResUnit"）
    pub layer_type: String,
    /// 层的描述信息（如 "16→32, 3×3, s2"）
    pub description: String,
    /// 属于该层的节点 ID 列表
    pub node_ids: Vec<NodeId>,
    /// 分组类型
    pub kind: GroupKind,
}

/// 构图检查点：用于失败时回滚到调用前的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphCheckpoint {
    pub(in crate::nn::graph) next_id: u64,
    pub(in crate::nn::graph) group_count: usize,
}
