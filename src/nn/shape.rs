/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 形状推导工具：卷积/池化的填充方式与输出尺寸计算
 *
 * 图中所有节点的形状均为"单样本形状"（通道在前，如 [C, H, W] 或 [F]），
 * batch 维度只在前向计算时出现，显示时记作 `?`，类似 Keras 的 (None, ...)。
 */

use super::GraphError;
use serde::{Deserialize, Serialize};

/// 填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// 输出尺寸为 ceil(输入 / 步长)，不足部分两侧补零（多出的一格补在后侧）
    #[default]
    Same,
    /// 不补零，窗口必须完全落在输入内
    Valid,
}

impl Padding {
    /// 计算单个空间维度的 (输出尺寸, 前侧填充量)
    ///
    /// ```text
    /// Same : out = ceil(in / s), pad_total = max((out - 1) * s + k - in, 0)
    ///        pad_before = pad_total / 2
    /// Valid: out = (in - k) / s + 1
    /// ```
    pub fn resolve(
        self,
        input: usize,
        kernel: usize,
        stride: usize,
    ) -> Result<(usize, usize), GraphError> {
        if kernel == 0 || stride == 0 {
            return Err(GraphError::InvalidConfig(format!(
                "窗口大小与步长须≥1，得到 kernel={kernel}, stride={stride}"
            )));
        }
        match self {
            Self::Same => {
                let out = input.div_ceil(stride);
                let pad_total = ((out.saturating_sub(1)) * stride + kernel).saturating_sub(input);
                Ok((out, pad_total / 2))
            }
            Self::Valid => {
                if input < kernel {
                    return Err(GraphError::ShapeMismatch {
                        expected: vec![kernel],
                        got: vec![input],
                        message: format!("valid 填充下输入尺寸{input}小于窗口尺寸{kernel}"),
                    });
                }
                Ok(((input - kernel) / stride + 1, 0))
            }
        }
    }
}

/// 将单样本形状格式化为带动态 batch 的形式，如 `[?, 16, 32, 32]`
pub fn format_batched_shape(shape: &[usize]) -> String {
    let mut parts = vec!["?".to_string()];
    parts.extend(shape.iter().map(ToString::to_string));
    format!("[{}]", parts.join(", "))
}
