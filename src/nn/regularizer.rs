/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 参数正则项
 */

use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// 附着在参数节点上的正则项，由`Model::regularization_penalty`汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Regularizer {
    /// λ·Σw²
    L2(f32),
}

impl Regularizer {
    pub fn penalty(&self, value: &Tensor) -> f32 {
        match self {
            Self::L2(lambda) => lambda * value.sum_of_squares(),
        }
    }
}
