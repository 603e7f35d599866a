/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : GraphInner 核心操作 + 前向传播
 */

use super::super::error::GraphError;
use super::super::types::{GraphCheckpoint, GroupKind, LayerGroup};
use super::GraphInner;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::NodeHandle;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashMap};

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    /// 创建一个带固定种子的计算图（确保可重复性）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_name_and_seed("default_graph", seed)
    }

    /// 创建一个带名称和固定种子的计算图
    pub fn with_name_and_seed(name: &str, seed: u64) -> Self {
        let mut graph = Self::with_name(name);
        graph.rng = Some(StdRng::seed_from_u64(seed));
        graph
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            forward_edges: HashMap::new(),
            backward_edges: HashMap::new(),
            next_id: 0,
            is_eval_mode: false,
            rng: None,
            layer_groups: Vec::new(),
        }
    }

    // ========== 基础访问器 ==========

    /// 检查图是否有固定种子
    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 所有节点 ID（升序，即拓扑序）
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(
        &mut self,
        id: NodeId,
    ) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_type_name(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.get_node(id)?.type_name())
    }

    /// 按名称查找节点
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(&id, _)| id)
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)
    }

    /// 节点的单样本形状（构图时即已确定）
    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    /// 所有参数节点（升序）
    pub fn get_parameter_nodes(&self) -> Vec<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|id| self.nodes[id].is_parameter())
            .collect()
    }

    // ========== 参数统计 ==========

    pub fn total_params(&self) -> usize {
        self.nodes.values().filter_map(NodeHandle::param_count).sum()
    }

    pub fn trainable_params(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.is_trainable())
            .filter_map(NodeHandle::param_count)
            .sum()
    }

    /// 所有带正则项的参数的惩罚之和
    pub fn regularization_penalty(&self) -> f32 {
        self.nodes
            .values()
            .filter_map(|n| Some(n.regularizer()?.penalty(n.value()?)))
            .sum()
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        // 先递增再返回，所以第一个节点 ID 是 1
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(
        &self,
        name: &str,
    ) -> Result<(), GraphError> {
        if self.nodes.values().any(|node| node.name() == name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    /// 生成合法的新节点名：给定名称则查重后原样使用，否则生成 `{前缀}_{n}`（n 从 1 起取最小可用值）
    pub fn generate_valid_new_node_name(
        &self,
        base_name: &str,
        prefix: &str,
    ) -> Result<String, GraphError> {
        if !base_name.is_empty() {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{prefix}_{counter}");
            if self.check_duplicate_node_name(&name).is_ok() {
                return Ok(name);
            }
            counter += 1;
        }
    }

    /// 生成层名：除层名本身外，`{层名}{后缀}`（如参数 `_K`、`_b`）也都不能与已有节点重名
    pub fn generate_valid_layer_name(
        &self,
        base_name: Option<&str>,
        prefix: &str,
        suffixes: &[&str],
    ) -> Result<String, GraphError> {
        let is_free = |name: &str| {
            self.check_duplicate_node_name(name).is_ok()
                && suffixes
                    .iter()
                    .all(|s| self.check_duplicate_node_name(&format!("{name}{s}")).is_ok())
        };
        if let Some(name) = base_name {
            self.check_duplicate_node_name(name)?;
            for s in suffixes {
                self.check_duplicate_node_name(&format!("{name}{s}"))?;
            }
            return Ok(name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{prefix}_{counter}");
            if is_free(&name) {
                return Ok(name);
            }
            counter += 1;
        }
    }

    // ========== 检查点/回滚 ==========

    /// 记录当前状态，供构图失败时回滚
    pub const fn checkpoint(&self) -> GraphCheckpoint {
        GraphCheckpoint {
            next_id: self.next_id,
            group_count: self.layer_groups.len(),
        }
    }

    /// 删除检查点之后创建的所有节点、边和分组
    ///
    /// `next_id` 不回退：已分配的 id 不再复用，回滚前拿到的旧句柄只会报`NodeNotFound`
    pub fn rollback(&mut self, checkpoint: GraphCheckpoint) {
        let is_new = |id: &NodeId| id.0 > checkpoint.next_id;

        self.nodes.retain(|id, _| !is_new(id));
        self.backward_edges.retain(|id, _| !is_new(id));
        self.forward_edges.retain(|id, _| !is_new(id));
        for children in self.forward_edges.values_mut() {
            children.retain(|id| !is_new(id));
        }
        self.layer_groups.truncate(checkpoint.group_count);
    }

    // ========== 层分组相关 ==========

    /// 获取所有层分组信息
    pub fn layer_groups(&self) -> &[LayerGroup] {
        &self.layer_groups
    }

    /// 注册一个层分组（同名分组只保留首个）
    pub fn register_layer_group(
        &mut self,
        name: &str,
        layer_type: &str,
        description: &str,
        node_ids: Vec<NodeId>,
    ) {
        self.register_group(name, layer_type, description, node_ids, GroupKind::Layer);
    }

    /// 注册一个模块级分组，包含 `since` 之后创建的全部节点
    pub fn register_block_group(
        &mut self,
        name: &str,
        layer_type: &str,
        description: &str,
        since: GraphCheckpoint,
    ) {
        let node_ids = self
            .nodes()
            .into_iter()
            .filter(|id| id.0 > since.next_id)
            .collect();
        self.register_group(name, layer_type, description, node_ids, GroupKind::Block);
    }

    fn register_group(
        &mut self,
        name: &str,
        layer_type: &str,
        description: &str,
        node_ids: Vec<NodeId>,
        kind: GroupKind,
    ) {
        if self.layer_groups.iter().any(|g| g.name == name) {
            return;
        }
        self.layer_groups.push(LayerGroup {
            name: name.to_string(),
            layer_type: layer_type.to_string(),
            description: description.to_string(),
            node_ids,
            kind,
        });
    }

    // ========== 前向传播 ==========

    /// 目标节点及其全部祖先（升序，即计算顺序）
    pub fn ancestors_of(&self, node_id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(node_id)?;
        let mut visited = BTreeSet::new();
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            if visited.insert(id) {
                if let Some(parents) = self.backward_edges.get(&id) {
                    stack.extend(parents.iter().copied());
                }
            }
        }
        Ok(visited.into_iter().collect())
    }

    /// 前向传播：按拓扑序计算目标节点所依赖的全部运算节点
    ///
    /// 输入节点须已通过 `set_node_value` 设置带 batch 的值。
    /// 训练模式下 BatchNorm 会同步更新其滑动统计量，Dropout 会随机置零。
    pub fn forward(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let order = self.ancestors_of(node_id)?;
        let is_train = self.is_train_mode();

        let mut batch_size = None;
        for &id in &order {
            let node = self.get_node(id)?;
            if node.is_input() {
                let value = node.value().ok_or_else(|| {
                    GraphError::InvalidOperation(format!("输入节点{}尚未设置值", node.name()))
                })?;
                let n = value.shape()[0];
                if *batch_size.get_or_insert(n) != n {
                    return Err(GraphError::ShapeMismatch {
                        expected: vec![batch_size.unwrap_or(n)],
                        got: vec![n],
                        message: format!("输入节点{}的 batch 大小与其它输入不一致", node.name()),
                    });
                }
            } else if node.is_parameter() && node.value().is_none() {
                return Err(GraphError::InvalidOperation(format!(
                    "参数节点{}没有值",
                    node.name()
                )));
            }
        }

        let mut fallback_rng;
        let rng = match self.rng.as_mut() {
            Some(rng) => rng,
            None => {
                fallback_rng = StdRng::from_entropy();
                &mut fallback_rng
            }
        };

        for id in order {
            let parents = self.backward_edges.get(&id).cloned().unwrap_or_default();
            if parents.is_empty() {
                // 输入、参数节点
                continue;
            }

            // 暂时取出本节点，以便同时借用父节点的值
            let mut node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
            let result = parents
                .iter()
                .map(|p| {
                    self.nodes
                        .get(p)
                        .and_then(NodeHandle::value)
                        .ok_or(GraphError::NodeNotFound(*p))
                })
                .collect::<Result<Vec<_>, _>>()
                .and_then(|values| node.node_type_mut().calc_value(&values, is_train, rng));
            let updates = node.node_type_mut().take_state_updates();
            let value = match result {
                Ok(value) => value,
                Err(e) => {
                    self.nodes.insert(id, node);
                    return Err(e);
                }
            };
            node.set_computed_value(value);
            self.nodes.insert(id, node);

            for (parent_index, state) in updates {
                if let Some(&parent_id) = parents.get(parent_index) {
                    self.nodes
                        .get_mut(&parent_id)
                        .ok_or(GraphError::NodeNotFound(parent_id))?
                        .set_value(Some(&state))?;
                }
            }
        }
        Ok(())
    }
}
