/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : BatchNorm 节点（按通道/特征归一化，作用于 batch 后的第 1 维）
 *
 * 父节点：[输入, γ, β, 滑动均值, 滑动方差]，后四者形状均为 [C]
 *
 * - 训练模式：使用当前 batch 的统计量，并按 momentum 更新滑动统计量
 * - 推理模式：使用滑动统计量
 *
 * y = γ · (x - μ) / sqrt(σ² + ε) + β
 */

use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, check_parent_count, check_shape};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use ndarray::Axis;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub(crate) struct BatchNorm {
    shape: Vec<usize>,
    epsilon: f32,
    momentum: f32,
    /// 训练模式前向后待写回的 (滑动均值, 滑动方差)
    pending_stats: Option<(Tensor, Tensor)>,
}

impl BatchNorm {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        epsilon: f32,
        momentum: f32,
    ) -> Result<Self, GraphError> {
        check_parent_count(parents, &[5], "BatchNorm")?;
        let shape = parents[0].value_expected_shape().to_vec();
        let channels = shape[0];
        for p in &parents[1..] {
            check_shape(p, &[channels], "BatchNorm")?;
        }
        if !(0.0..1.0).contains(&momentum) || epsilon <= 0.0 {
            return Err(GraphError::InvalidConfig(format!(
                "BatchNorm 须满足 0≤momentum<1 且 epsilon>0，得到 momentum={momentum}, epsilon={epsilon}"
            )));
        }
        Ok(Self {
            shape,
            epsilon,
            momentum,
            pending_stats: None,
        })
    }
}

impl TraitNode for BatchNorm {
    fn type_name(&self) -> &'static str {
        "BatchNorm"
    }

    fn name_prefix(&self) -> &'static str {
        "batch_norm"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::BatchNorm {
            epsilon: self.epsilon,
            momentum: self.momentum,
        }
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        is_train: bool,
        _rng: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        let x = parents[0].as_array();
        let gamma = parents[1].data_as_slice();
        let beta = parents[2].data_as_slice();
        let moving_mean = parents[3].data_as_slice();
        let moving_var = parents[4].data_as_slice();
        let channels = self.shape[0];

        if x.ndim() < 2 || x.shape()[1] != channels {
            return Err(GraphError::ComputationError(format!(
                "BatchNorm 输入形状{:?}与通道数{channels}不符",
                x.shape()
            )));
        }

        let mut output = x.to_owned();
        let mut new_mean = moving_mean.to_vec();
        let mut new_var = moving_var.to_vec();

        for ch in 0..channels {
            let column = x.index_axis(Axis(1), ch);
            let (mean, var) = if is_train && !column.is_empty() {
                let count = column.len() as f32;
                let mean = column.sum() / count;
                let var = column.fold(0.0, |acc, &v| acc + (v - mean).powi(2)) / count;
                new_mean[ch] = self.momentum * moving_mean[ch] + (1.0 - self.momentum) * mean;
                new_var[ch] = self.momentum * moving_var[ch] + (1.0 - self.momentum) * var;
                (mean, var)
            } else {
                (moving_mean[ch], moving_var[ch])
            };

            let scale = gamma[ch] / (var + self.epsilon).sqrt();
            let shift = beta[ch] - mean * scale;
            output
                .index_axis_mut(Axis(1), ch)
                .mapv_inplace(|v| v * scale + shift);
        }

        if is_train {
            self.pending_stats = Some((
                Tensor::new(&new_mean, &[channels]),
                Tensor::new(&new_var, &[channels]),
            ));
        }

        Ok(Tensor::from_array(output))
    }

    fn take_state_updates(&mut self) -> Vec<(usize, Tensor)> {
        self.pending_stats
            .take()
            .map(|(mean, var)| vec![(3, mean), (4, var)])
            .unwrap_or_default()
    }
}
