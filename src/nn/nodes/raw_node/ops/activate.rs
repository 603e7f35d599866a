use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parent_count};
use crate::nn::{Activation, GraphError};
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 逐元素激活节点，形状不变
#[derive(Debug, Clone)]
pub(crate) struct Activate {
    shape: Vec<usize>,
    kind: Activation,
}

impl Activate {
    pub(crate) fn new(parents: &[&NodeHandle], kind: Activation) -> Result<Self, GraphError> {
        check_parent_count(parents, &[1], "Activation")?;
        Ok(Self {
            shape: parents[0].value_expected_shape().to_vec(),
            kind,
        })
    }
}

impl TraitNode for Activate {
    fn type_name(&self) -> &'static str {
        "Activation"
    }

    fn name_prefix(&self) -> &'static str {
        "activation"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Activation { kind: self.kind }
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        _: bool,
        _: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        let kind = self.kind;
        Ok(Tensor::from_array(parents[0].as_array().mapv(|v| kind.apply(v))))
    }
}
