use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parent_count};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use rand::Rng;
use rand::rngs::StdRng;

/// Dropout 节点（inverted dropout）
///
/// 训练模式下以概率 `rate` 置零，保留的元素放大 1/(1-rate)；推理模式下为恒等映射
#[derive(Debug, Clone)]
pub(crate) struct Dropout {
    shape: Vec<usize>,
    rate: f32,
}

impl Dropout {
    pub(crate) fn new(parents: &[&NodeHandle], rate: f32) -> Result<Self, GraphError> {
        check_parent_count(parents, &[1], "Dropout")?;
        if !(0.0..1.0).contains(&rate) {
            return Err(GraphError::InvalidConfig(format!(
                "Dropout 比例须在 [0, 1) 内，得到 {rate}"
            )));
        }
        Ok(Self {
            shape: parents[0].value_expected_shape().to_vec(),
            rate,
        })
    }
}

impl TraitNode for Dropout {
    fn type_name(&self) -> &'static str {
        "Dropout"
    }

    fn name_prefix(&self) -> &'static str {
        "dropout"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Dropout { rate: self.rate }
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        is_train: bool,
        rng: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        if !is_train || self.rate == 0.0 {
            return Ok(parents[0].clone());
        }
        let keep = 1.0 - self.rate;
        let output = parents[0].as_array().mapv(|v| {
            if rng.gen_range(0.0..1.0) < keep {
                v / keep
            } else {
                0.0
            }
        });
        Ok(Tensor::from_array(output))
    }
}
