use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parent_count};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// Flatten 节点：单样本形状 [d1, d2, ...] → [d1·d2·...]，保留 batch 维
#[derive(Debug, Clone)]
pub(crate) struct Flatten {
    shape: Vec<usize>,
}

impl Flatten {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parent_count(parents, &[1], "Flatten")?;
        let total: usize = parents[0].value_expected_shape().iter().product();
        Ok(Self { shape: vec![total] })
    }
}

impl TraitNode for Flatten {
    fn type_name(&self) -> &'static str {
        "Flatten"
    }

    fn name_prefix(&self) -> &'static str {
        "flatten"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Flatten
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        _: bool,
        _: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        let x = parents[0];
        let batch = x.shape().first().copied().unwrap_or(0);
        Tensor::try_new(x.data_as_slice(), &[batch, self.shape[0]])
            .map_err(|e| GraphError::ComputationError(e.to_string()))
    }
}
