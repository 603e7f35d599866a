/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 全连接节点：y = x · W + b
 *
 * 父节点：[输入 [in], 权重 [in, out], 偏置 [out]（可选）]
 */

use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, batched_view, check_parent_count, check_shape};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use ndarray::{Ix1, Ix2};
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub(crate) struct Dense {
    shape: Vec<usize>,
}

impl Dense {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        check_parent_count(parents, &[2, 3], "Dense")?;
        let input_shape = parents[0].value_expected_shape();
        if input_shape.len() != 1 {
            return Err(GraphError::DimensionMismatch {
                expected: 1,
                got: input_shape.len(),
                message: format!("Dense 输入的单样本形状必须是 1D，得到 {input_shape:?}（可先 flatten）"),
            });
        }
        let weight_shape = parents[1].value_expected_shape();
        if weight_shape.len() != 2 || weight_shape[0] != input_shape[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![input_shape[0], weight_shape.get(1).copied().unwrap_or(0)],
                got: weight_shape.to_vec(),
                message: "Dense 权重须为 [in, out]".to_string(),
            });
        }
        let units = weight_shape[1];
        if let Some(bias) = parents.get(2) {
            check_shape(bias, &[units], "Dense 偏置")?;
        }
        Ok(Self { shape: vec![units] })
    }
}

impl TraitNode for Dense {
    fn type_name(&self) -> &'static str {
        "Dense"
    }

    fn name_prefix(&self) -> &'static str {
        "dense"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Dense {
            units: self.shape[0],
        }
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        _: bool,
        _: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        let x = batched_view::<Ix2>(parents[0], "Dense")?;
        let weight = batched_view::<Ix2>(parents[1], "Dense 权重")?;
        let mut y = x.dot(&weight);
        if let Some(bias) = parents.get(2) {
            y += &batched_view::<Ix1>(bias, "Dense 偏置")?;
        }
        Ok(Tensor::from_array(y.into_dyn()))
    }
}
