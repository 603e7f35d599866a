/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : GraphInner 节点构建方法（new_*_node）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::raw_node::{
    Activate, Add, AvgPool2d, BatchNorm, Conv2d, Dense, Dropout, Flatten, Input, Parameter,
    TraitNode,
};
use crate::nn::nodes::NodeHandle;
use crate::nn::{Activation, Init, NodeId, Padding, Regularizer};

impl GraphInner {
    /// 添加节点到列表（未指定名称时按节点类型前缀自动命名）
    pub(in crate::nn::graph) fn add_node_to_list(
        &mut self,
        mut node_handle: NodeHandle,
        name: Option<&str>,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        let prefix = node_handle.node_type().name_prefix();
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), prefix)?;
        let node_id = self.generate_valid_node_id();

        for &parent_id in parents {
            self.forward_edges
                .entry(parent_id)
                .or_default()
                .push(node_id);
        }
        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        node_handle.bind_id_and_name(node_id, &node_name);
        self.nodes.insert(node_id, node_handle);
        Ok(node_id)
    }

    /// 创建输入节点（`shape` 为单样本形状）
    pub fn new_input_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(Input::new(shape)?);
        self.add_node_to_list(node, name, &[])
    }

    /// 创建参数节点，并按`init`生成初始值（有种子时使用图的 RNG）
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        init: &Init,
        trainable: bool,
        regularizer: Option<Regularizer>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let mut node = NodeHandle::new(Parameter::new(shape, trainable, regularizer)?);
        let value = match self.rng.as_mut() {
            Some(rng) => init.generate_with_rng(shape, rng),
            None => init.generate(shape),
        };
        node.set_value(Some(&value))?;
        self.add_node_to_list(node, name, &[])
    }

    /// 创建卷积节点：父节点为 [输入, 卷积核, 偏置?]
    pub fn new_conv2d_node(
        &mut self,
        input_id: NodeId,
        kernel_id: NodeId,
        bias_id: Option<NodeId>,
        stride: (usize, usize),
        padding: Padding,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let mut parents = vec![input_id, kernel_id];
        parents.extend(bias_id);
        let handle = NodeHandle::new(Conv2d::new(&self.get_nodes(&parents)?, stride, padding)?);
        self.add_node_to_list(handle, name, &parents)
    }

    /// 创建批归一化节点：父节点为 [输入, gamma, beta, 滑动均值, 滑动方差]
    pub fn new_batch_norm_node(
        &mut self,
        parents: [NodeId; 5],
        epsilon: f32,
        momentum: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = BatchNorm::new(&self.get_nodes(&parents)?, epsilon, momentum)?;
        let handle = NodeHandle::new(node);
        self.add_node_to_list(handle, name, &parents)
    }

    pub fn new_activation_node(
        &mut self,
        input_id: NodeId,
        kind: Activation,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Activate::new(&self.get_nodes(&[input_id])?, kind)?);
        self.add_node_to_list(handle, name, &[input_id])
    }

    pub fn new_add_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Add::new(&self.get_nodes(parents)?)?);
        self.add_node_to_list(handle, name, parents)
    }

    pub fn new_avg_pool2d_node(
        &mut self,
        input_id: NodeId,
        pool_size: (usize, usize),
        stride: Option<(usize, usize)>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle =
            NodeHandle::new(AvgPool2d::new(&self.get_nodes(&[input_id])?, pool_size, stride)?);
        self.add_node_to_list(handle, name, &[input_id])
    }

    pub fn new_flatten_node(
        &mut self,
        input_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Flatten::new(&self.get_nodes(&[input_id])?)?);
        self.add_node_to_list(handle, name, &[input_id])
    }

    /// 创建全连接节点：父节点为 [输入, 权重, 偏置?]
    pub fn new_dense_node(
        &mut self,
        input_id: NodeId,
        weight_id: NodeId,
        bias_id: Option<NodeId>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let mut parents = vec![input_id, weight_id];
        parents.extend(bias_id);
        let handle = NodeHandle::new(Dense::new(&self.get_nodes(&parents)?)?);
        self.add_node_to_list(handle, name, &parents)
    }

    pub fn new_dropout_node(
        &mut self,
        input_id: NodeId,
        rate: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Dropout::new(&self.get_nodes(&[input_id])?, rate)?);
        self.add_node_to_list(handle, name, &[input_id])
    }
}
