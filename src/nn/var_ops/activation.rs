/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Var 激活函数扩展 trait
 */

use crate::nn::{Activation, GraphError, Var};
use std::rc::Rc;

/// 激活函数扩展 trait
///
/// # 使用示例
/// ```ignore
/// use resgraph::nn::{Activation, VarActivationOps};
///
/// let h = x.relu()?;
/// let y = h.activation(Activation::Tanh, Some("head_tanh"))?;
/// ```
pub trait VarActivationOps {
    /// 按激活函数种类创建激活节点
    fn activation(&self, kind: Activation, name: Option<&str>) -> Result<Var, GraphError>;

    /// `ReLU` 激活：max(0, x)
    fn relu(&self) -> Result<Var, GraphError> {
        self.activation(Activation::Relu, None)
    }

    /// Sigmoid 激活：1 / (1 + exp(-x))
    fn sigmoid(&self) -> Result<Var, GraphError> {
        self.activation(Activation::Sigmoid, None)
    }

    fn tanh(&self) -> Result<Var, GraphError> {
        self.activation(Activation::Tanh, None)
    }
}

impl VarActivationOps for Var {
    fn activation(&self, kind: Activation, name: Option<&str>) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_activation_node(self.node_id(), kind, name)?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }
}
