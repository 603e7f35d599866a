/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Var 合并扩展 trait（残差连接的相加）
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

pub trait VarMergeOps {
    /// 逐元素相加，两侧单样本形状必须完全一致（不做广播）
    fn add_merge(&self, other: &Var, name: Option<&str>) -> Result<Var, GraphError>;
}

impl VarMergeOps for Var {
    fn add_merge(&self, other: &Var, name: Option<&str>) -> Result<Var, GraphError> {
        self.check_same_graph(other)?;
        let id = self
            .graph()
            .borrow_mut()
            .new_add_node(&[self.node_id(), other.node_id()], name)?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }
}
