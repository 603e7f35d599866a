/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Var 池化与 Dropout 扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

pub trait VarPoolOps {
    /// 2D 平均池化（valid 填充），`stride` 为 None 时等于 `pool_size`
    fn avg_pool2d(
        &self,
        pool_size: (usize, usize),
        stride: Option<(usize, usize)>,
        name: Option<&str>,
    ) -> Result<Var, GraphError>;

    /// Inverted dropout，`rate` 须在 [0, 1) 内；推理模式下为恒等映射
    fn dropout(&self, rate: f32, name: Option<&str>) -> Result<Var, GraphError>;
}

impl VarPoolOps for Var {
    fn avg_pool2d(
        &self,
        pool_size: (usize, usize),
        stride: Option<(usize, usize)>,
        name: Option<&str>,
    ) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_avg_pool2d_node(self.node_id(), pool_size, stride, name)?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }

    fn dropout(&self, rate: f32, name: Option<&str>) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_dropout_node(self.node_id(), rate, name)?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }
}
