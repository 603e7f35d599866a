/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : AvgPool2d (2D 平均池化) 节点，valid 填充
 *
 * 输入：[C, H, W]，输出：[C, H', W']
 * H' = (H - pool_h) / stride_h + 1
 */

use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{TraitNode, batched_view, check_parent_count};
use crate::nn::{GraphError, Padding};
use crate::tensor::Tensor;
use ndarray::{Array4, Ix4, s};
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub(crate) struct AvgPool2d {
    shape: Vec<usize>,
    pool_size: (usize, usize),
    stride: (usize, usize),
}

impl AvgPool2d {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        pool_size: (usize, usize),
        stride: Option<(usize, usize)>,
    ) -> Result<Self, GraphError> {
        check_parent_count(parents, &[1], "AvgPool2d")?;
        let input_shape = parents[0].value_expected_shape();
        if input_shape.len() != 3 {
            return Err(GraphError::DimensionMismatch {
                expected: 3,
                got: input_shape.len(),
                message: format!("AvgPool2d 输入的单样本形状必须是 [C, H, W]，得到 {input_shape:?}"),
            });
        }
        // 未指定步长时等于池化窗口
        let stride = stride.unwrap_or(pool_size);
        let (out_h, _) = Padding::Valid.resolve(input_shape[1], pool_size.0, stride.0)?;
        let (out_w, _) = Padding::Valid.resolve(input_shape[2], pool_size.1, stride.1)?;
        Ok(Self {
            shape: vec![input_shape[0], out_h, out_w],
            pool_size,
            stride,
        })
    }
}

impl TraitNode for AvgPool2d {
    fn type_name(&self) -> &'static str {
        "AvgPool2d"
    }

    fn name_prefix(&self) -> &'static str {
        "avg_pool2d"
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::AvgPool2d {
            pool_size: self.pool_size,
            stride: self.stride,
        }
    }

    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        _: bool,
        _: &mut StdRng,
    ) -> Result<Tensor, GraphError> {
        let x = batched_view::<Ix4>(parents[0], "AvgPool2d")?;
        let batch = x.dim().0;
        let (channels, out_h, out_w) = (self.shape[0], self.shape[1], self.shape[2]);
        let (p_h, p_w) = self.pool_size;
        let (s_h, s_w) = self.stride;
        let area = (p_h * p_w) as f32;

        let mut output = Array4::<f32>::zeros((batch, channels, out_h, out_w));
        for ((n, c, oh, ow), v) in output.indexed_iter_mut() {
            let (h0, w0) = (oh * s_h, ow * s_w);
            *v = x.slice(s![n, c, h0..h0 + p_h, w0..w0 + p_w]).sum() / area;
        }
        Ok(Tensor::from_array(output.into_dyn()))
    }
}
