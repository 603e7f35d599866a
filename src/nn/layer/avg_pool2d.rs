/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : AvgPool2d (2D 平均池化) 层
 *
 * 输入/输出单样本形状：[C, H, W] → [C, H', W']，valid 填充
 * H' = (H - kH) / sH + 1
 *
 * 池化层没有参数，只是对节点构建的包装
 */

use crate::nn::{GraphError, Module, Var, VarPoolOps};

#[derive(Debug)]
pub struct AvgPool2d {
    pool_size: (usize, usize),
    /// None 表示等于 pool_size
    stride: Option<(usize, usize)>,
    name: Option<String>,
}

impl AvgPool2d {
    pub fn new(
        pool_size: (usize, usize),
        stride: Option<(usize, usize)>,
        name: Option<&str>,
    ) -> Result<Self, GraphError> {
        GraphError::check_at_least("pool_size", pool_size.0.min(pool_size.1), 1)?;
        if let Some((s_h, s_w)) = stride {
            GraphError::check_at_least("strides", s_h.min(s_w), 1)?;
        }
        Ok(Self {
            pool_size,
            stride,
            name: name.map(str::to_string),
        })
    }

    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.avg_pool2d(self.pool_size, self.stride, self.name.as_deref())
    }
}

impl Module for AvgPool2d {
    fn parameters(&self) -> Vec<Var> {
        Vec::new()
    }
}
