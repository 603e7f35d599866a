/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Dense (全连接) 层：y = act(x · W + b)
 *
 * 输入/输出单样本形状：[in_features] → [units]
 */

use crate::nn::{Activation, Graph, GraphError, Init, Module, Var, VarActivationOps};
use std::rc::Rc;

/// Dense (全连接) 层
///
/// 权重使用 Glorot 均匀初始化，偏置初始化为 0。
/// 指定非 linear 的激活函数时，额外创建一个激活节点 `{层名}_{激活名}`。
#[derive(Debug)]
pub struct Dense {
    /// 权重参数 [in_features, units]
    weights: Var,
    /// 偏置参数 [units]
    bias: Var,
    in_features: usize,
    units: usize,
    activation: Activation,
    name: String,
}

impl Dense {
    pub fn new(
        graph: &Graph,
        in_features: usize,
        units: usize,
        activation: Activation,
        name: Option<&str>,
    ) -> Result<Self, GraphError> {
        GraphError::check_at_least("in_features", in_features, 1)?;
        GraphError::check_at_least("units", units, 1)?;
        let act_suffix = format!("_{}", activation.name());
        let name = graph
            .inner()
            .generate_valid_layer_name(name, "dense", &["_W", "_b", &act_suffix])?;

        let weights = graph.parameter(
            &[in_features, units],
            Init::GlorotUniform,
            &format!("{name}_W"),
        )?;
        let bias = graph.parameter(&[units], Init::Zeros, &format!("{name}_b"))?;

        Ok(Self {
            weights,
            bias,
            in_features,
            units,
            activation,
            name,
        })
    }

    /// 前向传播（构图）：输入单样本形状须为 [in_features]
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.check_same_graph(&self.weights)?;
        let graph = x.get_graph();
        let out_id = graph.inner_mut().new_dense_node(
            x.node_id(),
            self.weights.node_id(),
            Some(self.bias.node_id()),
            Some(&self.name),
        )?;
        let mut output = Var::new(out_id, Rc::clone(x.graph()));

        let mut node_ids = vec![self.weights.node_id(), self.bias.node_id(), out_id];
        if self.activation != Activation::Linear {
            output = output.activation(
                self.activation,
                Some(&format!("{}_{}", self.name, self.activation.name())),
            )?;
            node_ids.push(output.node_id());
        }

        graph.inner_mut().register_layer_group(
            &self.name,
            "Dense",
            &format!("{}→{}, {}", self.in_features, self.units, self.activation),
            node_ids,
        );
        Ok(output)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn units(&self) -> usize {
        self.units
    }
}

impl Module for Dense {
    fn parameters(&self) -> Vec<Var> {
        vec![self.weights.clone(), self.bias.clone()]
    }
}
