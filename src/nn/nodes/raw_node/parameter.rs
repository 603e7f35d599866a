use super::TraitNode;
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::{GraphError, Regularizer};
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 参数节点（卷积核、权重、偏置、BatchNorm 的 γ/β 及滑动统计量）
#[derive(Debug, Clone)]
pub(crate) struct Parameter {
    shape: Vec<usize>,
    /// 是否由优化器更新（BatchNorm 的滑动均值/方差为 false）
    trainable: bool,
    regularizer: Option<Regularizer>,
}

impl Parameter {
    pub(crate) fn new(
        shape: &[usize],
        trainable: bool,
        regularizer: Option<Regularizer>,
    ) -> Result<Self, GraphError> {
        if shape.is_empty() || shape.contains(&0) {
            return Err(GraphError::InvalidConfig(format!(
                "参数形状的各维须≥1，得到 {shape:?}"
            )));
        }
        Ok(Self {
            shape: shape.to_vec(),
            trainable,
            regularizer,
        })
    }

    pub(crate) const fn is_trainable(&self) -> bool {
        self.trainable
    }

    pub(crate) const fn regularizer(&self) -> Option<Regularizer> {
        self.regularizer
    }
}

impl TraitNode for Parameter {
    fn type_name(&self) -> &'static str {
        "Parameter"
    }

    fn name_prefix(&self) -> &'static str {
        "param"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Parameter {
            trainable: self.trainable,
        }
    }

    fn calc_value(&mut self, _: &[&Tensor], _: bool, _: &mut StdRng) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "参数节点的值须由初始化或加载设置".to_string(),
        ))
    }
}
