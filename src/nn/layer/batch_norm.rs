/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : BatchNorm (批归一化) 层
 *
 * 作用于单样本形状的第 0 维（卷积输出为通道，全连接输出为特征）。
 * 参数：γ、β 可训练；滑动均值、滑动方差不可训练，由训练模式下的前向更新。
 */

use crate::nn::{Graph, GraphError, Init, Module, Var};
use std::rc::Rc;

/// Keras 默认值
pub const DEFAULT_EPSILON: f32 = 1e-3;
pub const DEFAULT_MOMENTUM: f32 = 0.99;

#[derive(Debug)]
pub struct BatchNorm {
    gamma: Var,
    beta: Var,
    moving_mean: Var,
    moving_var: Var,
    channels: usize,
    epsilon: f32,
    momentum: f32,
    name: String,
}

impl BatchNorm {
    /// 创建 BatchNorm 层（epsilon、momentum 取默认值）
    pub fn new(graph: &Graph, channels: usize, name: Option<&str>) -> Result<Self, GraphError> {
        Self::with_options(graph, channels, DEFAULT_EPSILON, DEFAULT_MOMENTUM, name)
    }

    pub fn with_options(
        graph: &Graph,
        channels: usize,
        epsilon: f32,
        momentum: f32,
        name: Option<&str>,
    ) -> Result<Self, GraphError> {
        GraphError::check_at_least("channels", channels, 1)?;
        let name = graph.inner().generate_valid_layer_name(
            name,
            "batch_norm",
            &["_gamma", "_beta", "_moving_mean", "_moving_var"],
        )?;

        let gamma = graph.parameter(&[channels], Init::Ones, &format!("{name}_gamma"))?;
        let beta = graph.parameter(&[channels], Init::Zeros, &format!("{name}_beta"))?;
        let moving_mean = graph.parameter_with(
            &[channels],
            Init::Zeros,
            false,
            None,
            &format!("{name}_moving_mean"),
        )?;
        let moving_var = graph.parameter_with(
            &[channels],
            Init::Ones,
            false,
            None,
            &format!("{name}_moving_var"),
        )?;

        Ok(Self {
            gamma,
            beta,
            moving_mean,
            moving_var,
            channels,
            epsilon,
            momentum,
            name,
        })
    }

    /// 前向传播（构图）：输入单样本形状的第 0 维须等于 channels
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.check_same_graph(&self.gamma)?;
        let graph = x.get_graph();
        let out_id = graph.inner_mut().new_batch_norm_node(
            [
                x.node_id(),
                self.gamma.node_id(),
                self.beta.node_id(),
                self.moving_mean.node_id(),
                self.moving_var.node_id(),
            ],
            self.epsilon,
            self.momentum,
            Some(&self.name),
        )?;

        let mut node_ids: Vec<_> = self.parameters().iter().map(Var::node_id).collect();
        node_ids.push(out_id);
        graph.inner_mut().register_layer_group(
            &self.name,
            "BatchNorm",
            &format!("{} ch, ε={}", self.channels, self.epsilon),
            node_ids,
        );

        Ok(Var::new(out_id, Rc::clone(x.graph())))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn moving_mean(&self) -> &Var {
        &self.moving_mean
    }

    pub const fn moving_var(&self) -> &Var {
        &self.moving_var
    }
}

impl Module for BatchNorm {
    /// 包含不可训练的滑动统计量
    fn parameters(&self) -> Vec<Var> {
        vec![
            self.gamma.clone(),
            self.beta.clone(),
            self.moving_mean.clone(),
            self.moving_var.clone(),
        ]
    }
}
