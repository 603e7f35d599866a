use super::TraitNode;
use crate::nn::GraphError;
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 符号输入节点：只声明单样本形状，值在前向时由外部设置
#[derive(Debug, Clone)]
pub(crate) struct Input {
    shape: Vec<usize>,
}

impl Input {
    pub(crate) fn new(shape: &[usize]) -> Result<Self, GraphError> {
        if shape.is_empty() || shape.contains(&0) {
            return Err(GraphError::InvalidConfig(format!(
                "输入形状的各维须≥1，得到 {shape:?}"
            )));
        }
        Ok(Self {
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Input {
    fn type_name(&self) -> &'static str {
        "Input"
    }

    fn name_prefix(&self) -> &'static str {
        "input"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Input
    }

    fn calc_value(&mut self, _: &[&Tensor], _: bool, _: &mut StdRng) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "输入节点的值须由外部设置".to_string(),
        ))
    }
}
