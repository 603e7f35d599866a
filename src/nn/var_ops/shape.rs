/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Var 形状变换扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

pub trait VarShapeOps {
    /// 展平为一维特征：[C, H, W] → [C·H·W]（batch 维保留）
    fn flatten(&self, name: Option<&str>) -> Result<Var, GraphError>;
}

impl VarShapeOps for Var {
    fn flatten(&self, name: Option<&str>) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_flatten_node(self.node_id(), name)?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }
}
