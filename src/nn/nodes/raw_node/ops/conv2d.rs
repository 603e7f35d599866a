/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 2D 卷积节点
 *
 * 父节点：
 * - parents[0]: 输入数据，单样本形状 [C_in, H, W]
 * - parents[1]: 卷积核参数 [C_out, C_in, kH, kW]
 * - parents[2]: 偏置参数 [C_out]（可选）
 *
 * 输出：[C_out, H', W']，H'/W' 由填充方式决定（见 `Padding::resolve`）
 * 前向计算使用 Rayon 在 batch 维度并行
 */

use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, batched_view, check_parent_count, check_shape};
use crate::nn::{GraphError, Padding};
use crate::tensor::Tensor;
use ndarray::{Array4, Ix1, Ix4, Zip};
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub(crate) struct Conv2d {
    /// 输出形状 [C_out, H', W']
    shape: Vec<usize>,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
    /// 上侧/左侧的补零量（下侧/右侧由输出尺寸隐含）
    pad_before: (usize, usize),
}

impl Conv2d {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, GraphError> {
        check_parent_count(parents, &[2, 3], "Conv2d")?;

        let input_shape = parents[0].value_expected_shape();
        let kernel_shape = parents[1].value_expected_shape();

        if kernel_shape.len() != 4 {
            return Err(GraphError::DimensionMismatch {
                expected: 4,
                got: kernel_shape.len(),
                message: "卷积核必须是 4D [C_out, C_in, kH, kW]".to_string(),
            });
        }
        if input_shape.len() != 3 {
            return Err(GraphError::DimensionMismatch {
                expected: 3,
                got: input_shape.len(),
                message: format!("Conv2d 输入的单样本形状必须是 [C_in, H, W]，得到 {input_shape:?}"),
            });
        }
        let (out_c, in_c, k_h, k_w) = (
            kernel_shape[0],
            kernel_shape[1],
            kernel_shape[2],
            kernel_shape[3],
        );
        if input_shape[0] != in_c {
            return Err(GraphError::ShapeMismatch {
                expected: vec![in_c, input_shape[1], input_shape[2]],
                got: input_shape.to_vec(),
                message: format!("Conv2d 输入通道数{}与卷积核的{in_c}不符", input_shape[0]),
            });
        }
        if let Some(bias) = parents.get(2) {
            check_shape(bias, &[out_c], "Conv2d 偏置")?;
        }

        let (out_h, pad_top) = padding.resolve(input_shape[1], k_h, stride.0)?;
        let (out_w, pad_left) = padding.resolve(input_shape[2], k_w, stride.1)?;

        Ok(Self {
            shape: vec![out_c, out_h, out_w],
            kernel_size: (k_h, k_w),
            stride,
            padding,
            pad_before: (pad_top, pad_left),
        })
    }
}

impl TraitNode for Conv2d {
    fn type_name(&self) -> &'static str {
        "Conv2d"
    }

    fn name_prefix(&self) -> &'static str {
        "conv2d"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Conv2d {
            kernel_size: self.kernel_size,
            stride: self.stride,
            padding: self.padding,
        }
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        _is_train: bool,
        _rng: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        let x = batched_view::<Ix4>(parents[0], "Conv2d")?;
        let kernel = batched_view::<Ix4>(parents[1], "Conv2d 卷积核")?;
        let bias = parents
            .get(2)
            .map(|b| batched_view::<Ix1>(b, "Conv2d 偏置"))
            .transpose()?;

        let (batch, in_c, in_h, in_w) = x.dim();
        let (out_c, out_h, out_w) = (self.shape[0], self.shape[1], self.shape[2]);
        let (k_h, k_w) = self.kernel_size;
        let (s_h, s_w) = self.stride;
        let (p_top, p_left) = self.pad_before;

        let mut output = Array4::<f32>::zeros((batch, out_c, out_h, out_w));
        Zip::from(output.outer_iter_mut())
            .and(x.outer_iter())
            .par_for_each(|mut out, sample| {
                for f in 0..out_c {
                    let b = bias.as_ref().map_or(0.0, |b| b[f]);
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let mut acc = b;
                            for c in 0..in_c {
                                for i in 0..k_h {
                                    let ih = (oh * s_h + i) as isize - p_top as isize;
                                    if ih < 0 || ih >= in_h as isize {
                                        continue;
                                    }
                                    for j in 0..k_w {
                                        let iw = (ow * s_w + j) as isize - p_left as isize;
                                        if iw < 0 || iw >= in_w as isize {
                                            continue;
                                        }
                                        acc += sample[[c, ih as usize, iw as usize]]
                                            * kernel[[f, c, i, j]];
                                    }
                                }
                            }
                            out[[f, oh, ow]] = acc;
                        }
                    }
                }
            });

        Ok(Tensor::from_array(output.into_dyn()))
    }
}
