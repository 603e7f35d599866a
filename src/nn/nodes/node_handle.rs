use super::raw_node::{NodeType, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::{GraphError, Regularizer};
use crate::tensor::Tensor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 图中的节点：ID、名称、具体节点类型及当前值
#[derive(Debug, Clone)]
pub(crate) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    /// 参数节点：参数值；输入节点：外部设置的 batch 值；运算节点：最近一次前向的结果
    value: Option<Tensor>,
}

impl NodeHandle {
    pub(crate) fn new<T: Into<NodeType>>(raw_node: T) -> Self {
        Self {
            id: NodeId(0),
            name: String::new(),
            raw_node: raw_node.into(),
            value: None,
        }
    }

    pub(crate) fn bind_id_and_name(&mut self, id: NodeId, name: &str) {
        self.id = id;
        self.name = name.to_string();
    }

    pub(crate) const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    pub(crate) fn node_type_mut(&mut self) -> &mut NodeType {
        &mut self.raw_node
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.raw_node.type_name()
    }

    pub(crate) fn descriptor(&self) -> NodeTypeDescriptor {
        self.raw_node.descriptor()
    }

    /// 单样本形状（参数节点则为完整形状）
    pub(crate) fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.output_shape()
    }

    pub(crate) const fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    /// 手动设置节点值（仅输入节点、参数节点允许）
    pub(crate) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        let Some(value) = value else {
            self.value = None;
            return Ok(());
        };
        let expected = self.value_expected_shape();
        match &self.raw_node {
            NodeType::Parameter(_) => {
                if value.shape() != expected {
                    return Err(GraphError::ShapeMismatch {
                        expected: expected.to_vec(),
                        got: value.shape().to_vec(),
                        message: format!("参数节点{}的值形状不符", self.name),
                    });
                }
            }
            NodeType::Input(_) => {
                if value.dimension() != expected.len() + 1 || &value.shape()[1..] != expected {
                    let mut batched = vec![value.shape().first().copied().unwrap_or(0)];
                    batched.extend_from_slice(expected);
                    return Err(GraphError::ShapeMismatch {
                        expected: batched,
                        got: value.shape().to_vec(),
                        message: format!("输入节点{}须为 [batch, ...单样本形状]", self.name),
                    });
                }
                if value.shape()[0] == 0 {
                    return Err(GraphError::InvalidOperation(format!(
                        "输入节点{}的 batch 大小须≥1",
                        self.name
                    )));
                }
            }
            _ => {
                return Err(GraphError::InvalidOperation(format!(
                    "{}节点{}的值由前向传播计算，不应手动设置",
                    self.type_name(),
                    self.name
                )));
            }
        }
        self.value = Some(value.clone());
        Ok(())
    }

    /// 前向传播写回计算结果
    pub(crate) fn set_computed_value(&mut self, value: Tensor) {
        self.value = Some(value);
    }

    pub(crate) const fn is_parameter(&self) -> bool {
        matches!(self.raw_node, NodeType::Parameter(_))
    }

    pub(crate) const fn is_input(&self) -> bool {
        matches!(self.raw_node, NodeType::Input(_))
    }

    pub(crate) fn is_trainable(&self) -> bool {
        match &self.raw_node {
            NodeType::Parameter(p) => p.is_trainable(),
            _ => false,
        }
    }

    pub(crate) fn regularizer(&self) -> Option<Regularizer> {
        match &self.raw_node {
            NodeType::Parameter(p) => p.regularizer(),
            _ => None,
        }
    }

    /// 参数元素个数（非参数节点为 None）
    pub(crate) fn param_count(&self) -> Option<usize> {
        self.is_parameter()
            .then(|| self.value_expected_shape().iter().product())
    }
}
