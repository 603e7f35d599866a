/*
 * @Author       : 老董
 * @Date         : 2026-03-07
 * @Description  : 优化器配置
 *
 * 本库只构图与前向推理，不做反向传播；优化器仅作为可序列化的配置
 * 随模型保存，供下游训练程序读取。
 */

use crate::errors::ComparisonOperator;
use crate::nn::GraphError;
use serde::{Deserialize, Serialize};

/// Adam 优化器配置（默认值与 Keras 一致）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adam {
    pub learning_rate: f32,
    /// β1 (一阶矩衰减)
    pub beta1: f32,
    /// β2 (二阶矩衰减)
    pub beta2: f32,
    /// 数值稳定项
    pub epsilon: f32,
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        }
    }
}

impl Adam {
    /// 以给定学习率创建，其余取默认值
    pub fn new(learning_rate: f32) -> Result<Self, GraphError> {
        let adam = Self {
            learning_rate,
            ..Self::default()
        };
        adam.validate()?;
        Ok(adam)
    }

    /// 学习率、ε 须 > 0，β 须在 [0, 1) 内
    pub fn validate(&self) -> Result<(), GraphError> {
        for (name, value) in [("learning_rate", self.learning_rate), ("epsilon", self.epsilon)] {
            if value.is_nan() || value <= 0.0 {
                return Err(GraphError::InvalidConfig(format!(
                    "Adam 的{name}须{}0，得到{value}",
                    ComparisonOperator::GreaterThan
                )));
            }
        }
        for (name, value) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&value) {
                return Err(GraphError::InvalidConfig(format!(
                    "Adam 的{name}须在 [0, 1) 内，得到{value}"
                )));
            }
        }
        Ok(())
    }
}
