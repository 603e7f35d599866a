/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 卷积-归一化-激活单元
 *
 * conv_first = true : conv → bn → activation
 * conv_first = false: bn → activation → conv（预激活）
 *
 * 卷积统一使用 same 填充、He 正态初始化和 L2(1e-4) 正则。
 * 输出单样本形状：[filters, ceil(H / s), ceil(W / s)]
 */

use super::naming::sub_name;
use crate::nn::{
    Activation, BatchNorm, Conv2d, GraphError, Padding, Regularizer, Var, VarActivationOps,
};
use serde::{Deserialize, Serialize};

/// 卷积核 L2 正则系数
pub const KERNEL_L2: f32 = 1e-4;

/// 卷积单元配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub filters: usize,
    /// 方形卷积核边长
    pub kernel_size: usize,
    pub strides: usize,
    /// None 表示不加激活
    pub activation: Option<Activation>,
    pub batch_normalization: bool,
    /// false 时为预激活顺序
    pub conv_first: bool,
    /// 节点名标签，仅影响命名
    pub name: Option<String>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            filters: 16,
            kernel_size: 3,
            strides: 1,
            activation: Some(Activation::Relu),
            batch_normalization: true,
            conv_first: true,
            name: None,
        }
    }
}

impl LayerConfig {
    pub fn new(filters: usize) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    pub fn strides(mut self, strides: usize) -> Self {
        self.strides = strides;
        self
    }

    pub fn activation(mut self, activation: Option<Activation>) -> Self {
        self.activation = activation;
        self
    }

    /// 按名称设置激活函数（"none" 表示不加激活），未知名称立即报错
    pub fn activation_name(mut self, name: &str) -> Result<Self, GraphError> {
        self.activation = parse_activation(name)?;
        Ok(self)
    }

    pub fn batch_normalization(mut self, enabled: bool) -> Self {
        self.batch_normalization = enabled;
        self
    }

    pub fn conv_first(mut self, conv_first: bool) -> Self {
        self.conv_first = conv_first;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        GraphError::check_at_least("filters", self.filters, 1)?;
        GraphError::check_at_least("kernel_size", self.kernel_size, 1)?;
        GraphError::check_at_least("strides", self.strides, 1)
    }
}

/// 解析激活函数名，"none"（或空串）表示不加激活
pub fn parse_activation(name: &str) -> Result<Option<Activation>, GraphError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "none" => Ok(None),
        other => other.parse().map(Some),
    }
}

/// 构建一个卷积单元，返回新的输出句柄（`x` 保持可用，可作跳连）
///
/// `x` 的单样本形状须为 [C, H, W]。失败时图中不会残留本次创建的任何节点。
pub fn res_layer(x: &Var, config: &LayerConfig) -> Result<Var, GraphError> {
    config.validate()?;
    let input_shape = x.shape()?;
    if input_shape.len() != 3 {
        return Err(GraphError::DimensionMismatch {
            expected: 3,
            got: input_shape.len(),
            message: format!("卷积单元的输入须为 [C, H, W]，得到 {input_shape:?}"),
        });
    }
    let in_channels = input_shape[0];
    let graph = x.get_graph();
    let label = config.name.as_deref();

    let y = graph.atomic(|| {
        let since = graph.checkpoint();
        let conv = |input: &Var| -> Result<Var, GraphError> {
            Conv2d::new(
                &graph,
                in_channels,
                config.filters,
                (config.kernel_size, config.kernel_size),
                (config.strides, config.strides),
                Padding::Same,
                true,
                Some(Regularizer::L2(KERNEL_L2)),
                sub_name(label, "conv").as_deref(),
            )?
            .forward(input)
        };
        let norm_act = |input: &Var, channels: usize| -> Result<Var, GraphError> {
            let mut y = input.clone();
            if config.batch_normalization {
                y = BatchNorm::new(&graph, channels, sub_name(label, "bn").as_deref())?
                    .forward(&y)?;
            }
            if let Some(act) = config.activation {
                y = y.activation(act, sub_name(label, act.name()).as_deref())?;
            }
            Ok(y)
        };

        let y = if config.conv_first {
            norm_act(&conv(x)?, config.filters)?
        } else {
            conv(&norm_act(x, in_channels)?)?
        };

        if let Some(label) = label {
            graph.register_block_group(
                label,
                "ResLayer",
                &format!(
                    "{}→{}, {}×{}, s{}",
                    in_channels,
                    config.filters,
                    config.kernel_size,
                    config.kernel_size,
                    config.strides
                ),
                since,
            );
        }
        Ok(y)
    })?;

    tracing::debug!(
        "卷积单元{}: {:?} → {:?}",
        label.unwrap_or("-"),
        input_shape,
        y.shape()?
    );
    Ok(y)
}
