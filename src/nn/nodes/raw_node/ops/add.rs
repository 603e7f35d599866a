use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parent_count};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 逐元素相加（残差合并）。两个父节点的形状必须完全一致，不做广播
#[derive(Debug, Clone)]
pub(crate) struct Add {
    shape: Vec<usize>,
}

impl Add {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parent_count(parents, &[2], "Add")?;
        let left = parents[0].value_expected_shape();
        let right = parents[1].value_expected_shape();
        if left != right {
            return Err(GraphError::ShapeMismatch {
                expected: left.to_vec(),
                got: right.to_vec(),
                message: format!(
                    "Add 两侧形状不一致：{} 与 {}",
                    parents[0].name(),
                    parents[1].name()
                ),
            });
        }
        Ok(Self {
            shape: left.to_vec(),
        })
    }
}

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn name_prefix(&self) -> &'static str {
        "add"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Add
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        _: bool,
        _: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        if !parents[0].is_same_shape(parents[1]) {
            return Err(GraphError::ComputationError(format!(
                "Add 两侧的值形状不一致：{:?} 与 {:?}",
                parents[0].shape(),
                parents[1].shape()
            )));
        }
        Ok(Tensor::from_array(parents[0].as_array() + parents[1].as_array()))
    }
}
