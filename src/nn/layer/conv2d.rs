/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Conv2d (2D 卷积) 层
 *
 * 输入/输出单样本形状：[C_in, H, W] → [C_out, H', W']
 *
 * 输出尺寸计算（见 `Padding::resolve`）：
 * - Same : H' = ceil(H / s)
 * - Valid: H' = (H - k) / s + 1
 *
 * 计算：output = conv2d(x, K) + b
 */

use crate::nn::{Graph, GraphError, Init, Module, Padding, Regularizer, Var};
use std::rc::Rc;

/// Conv2d (2D 卷积) 层
///
/// 卷积核使用 He 正态初始化，偏置初始化为 0；正则项（如有）只作用于卷积核。
///
/// # 使用示例
/// ```ignore
/// let conv = Conv2d::new(
///     &graph, 3, 16, (3, 3), (1, 1), Padding::Same, true, None, Some("Inpt_conv"),
/// )?;
/// let h = conv.forward(&x)?;
/// ```
#[derive(Debug)]
pub struct Conv2d {
    /// 卷积核参数 [out_channels, in_channels, kernel_h, kernel_w]
    kernel: Var,
    /// 偏置参数 [out_channels]（可选）
    bias: Option<Var>,
    in_channels: usize,
    out_channels: usize,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
    /// 层名称（运算节点名、可视化分组名）
    name: String,
}

impl Conv2d {
    /// 创建新的 Conv2d 层
    ///
    /// # 参数
    /// - `graph`: 计算图句柄
    /// - `in_channels`/`out_channels`: 输入/输出通道数
    /// - `kernel_size`: 卷积核大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)
    /// - `padding`: 填充方式
    /// - `use_bias`: 是否使用偏置
    /// - `regularizer`: 卷积核的正则项
    /// - `name`: 层名称，None 时自动生成
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        graph: &Graph,
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        use_bias: bool,
        regularizer: Option<Regularizer>,
        name: Option<&str>,
    ) -> Result<Self, GraphError> {
        GraphError::check_at_least("in_channels", in_channels, 1)?;
        GraphError::check_at_least("filters", out_channels, 1)?;
        GraphError::check_at_least("kernel_size", kernel_size.0.min(kernel_size.1), 1)?;
        GraphError::check_at_least("strides", stride.0.min(stride.1), 1)?;

        let name = graph
            .inner()
            .generate_valid_layer_name(name, "conv2d", &["_K", "_b"])?;
        let (k_h, k_w) = kernel_size;

        let kernel = graph.parameter_with(
            &[out_channels, in_channels, k_h, k_w],
            Init::HeNormal,
            true,
            regularizer,
            &format!("{name}_K"),
        )?;
        let bias = if use_bias {
            Some(graph.parameter(&[out_channels], Init::Zeros, &format!("{name}_b"))?)
        } else {
            None
        };

        Ok(Self {
            kernel,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
            name,
        })
    }

    /// 前向传播（构图）：输入单样本形状须为 [in_channels, H, W]
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.check_same_graph(&self.kernel)?;
        let graph = x.get_graph();
        let out_id = graph.inner_mut().new_conv2d_node(
            x.node_id(),
            self.kernel.node_id(),
            self.bias.as_ref().map(Var::node_id),
            self.stride,
            self.padding,
            Some(&self.name),
        )?;

        let mut node_ids: Vec<_> = self.parameters().iter().map(Var::node_id).collect();
        node_ids.push(out_id);
        graph.inner_mut().register_layer_group(
            &self.name,
            "Conv2d",
            &format!(
                "{}→{}, {}×{}, s{}",
                self.in_channels,
                self.out_channels,
                self.kernel_size.0,
                self.kernel_size.1,
                self.stride.0
            ),
            node_ids,
        );

        Ok(Var::new(out_id, Rc::clone(x.graph())))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub const fn kernel(&self) -> &Var {
        &self.kernel
    }

    pub const fn bias(&self) -> Option<&Var> {
        self.bias.as_ref()
    }
}

impl Module for Conv2d {
    fn parameters(&self) -> Vec<Var> {
        std::iter::once(self.kernel.clone())
            .chain(self.bias.clone())
            .collect()
    }
}
