/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 多层感知机：[dim] → 8 → 16 → 4 [→ 1]
 */

use crate::device::DeviceContext;
use crate::nn::{Activation, Adam, Dense, Graph, GraphError, Model};

/// 隐藏层宽度
const HIDDEN_UNITS: [usize; 3] = [8, 16, 4];

/// 构建 MLP：三个 relu 全连接层，回归时追加一个线性输出单元
pub fn create_mlp(ctx: &DeviceContext, dim: usize, regress: bool) -> Result<Model, GraphError> {
    GraphError::check_at_least("dim", dim, 1)?;

    let graph = Graph::with_name("mlp", ctx.seed());
    let inputs = graph.input(&[dim], Some("input"))?;

    let mut x = inputs.clone();
    let mut in_features = dim;
    for units in HIDDEN_UNITS {
        x = Dense::new(&graph, in_features, units, Activation::Relu, None)?.forward(&x)?;
        in_features = units;
    }
    if regress {
        x = Dense::new(&graph, in_features, 1, Activation::Linear, None)?.forward(&x)?;
    }

    let mut model = Model::new(inputs, x)?;
    model.compile(Adam::default())?;
    Ok(model)
}
