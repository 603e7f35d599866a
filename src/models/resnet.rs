/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : ResNet v1（3 个 stage，每个 stage 3 个残差单元）
 *
 * 输入 [depth, height, width]
 *   → Inpt: res_layer(16)
 *   → Stg1: 3×16（不下采样）→ Stg2: 3×32（↓2）→ Stg3: 3×64（↓2）
 *   → AvgPool(8×8) → flatten → dense(16, relu) → bn → dropout(0.5)
 *   → dense(4, relu) [→ dense(1, linear)，仅回归时]
 */

use super::res_block::res_block_v1;
use super::res_layer::{LayerConfig, res_layer};
use crate::device::DeviceContext;
use crate::nn::{
    Activation, Adam, AvgPool2d, BatchNorm, Dense, Dropout, Graph, GraphError, Model, Var,
    VarShapeOps,
};

/// 各 stage 的 (名称, 通道数, 是否下采样)
pub const RESNET_STAGES: [(&str, usize, bool); 3] =
    [("Stg1", 16, false), ("Stg2", 32, true), ("Stg3", 64, true)];
/// 每个 stage 的残差单元数
const UNITS_PER_STAGE: usize = 3;
const INPUT_FILTERS: usize = 16;
const POOL_SIZE: usize = 8;
const DROPOUT_RATE: f32 = 0.5;

/// 构建 ResNet v1 模型
///
/// 空间尺寸经两次下采样后须不小于池化窗口（8），即 width、height 至少为 29。
/// 设备上下文带种子时参数初始化可复现。
pub fn create_resnet_v1(
    ctx: &DeviceContext,
    width: usize,
    height: usize,
    depth: usize,
    regress: bool,
) -> Result<Model, GraphError> {
    GraphError::check_at_least("width", width, 1)?;
    GraphError::check_at_least("height", height, 1)?;
    GraphError::check_at_least("depth", depth, 1)?;

    let graph = Graph::with_name("resnet_v1", ctx.seed());
    let inputs = graph.input(&[depth, height, width], Some("input"))?;

    let mut x = res_layer(&inputs, &LayerConfig::new(INPUT_FILTERS).name("Inpt"))?;
    for (name, filters, downsample) in RESNET_STAGES {
        x = res_block_v1(&x, filters, UNITS_PER_STAGE, downsample, name)?;
    }

    let x = head(&graph, &x, regress)?;
    let mut model = Model::new(inputs, x)?;
    model.compile(Adam::default())?;
    Ok(model)
}

/// 头部：平均池化 → 展平 → 全连接
fn head(graph: &Graph, x: &Var, regress: bool) -> Result<Var, GraphError> {
    let x = AvgPool2d::new((POOL_SIZE, POOL_SIZE), None, Some("AvgPool"))?.forward(x)?;
    let x = x.flatten(None)?;
    let features = x.shape()?[0];

    let x = Dense::new(graph, features, 16, Activation::Relu, None)?.forward(&x)?;
    let x = BatchNorm::new(graph, 16, None)?.forward(&x)?;
    let x = Dropout::new(DROPOUT_RATE, None)?.forward(&x)?;
    let mut x = Dense::new(graph, 16, 4, Activation::Relu, None)?.forward(&x)?;
    if regress {
        x = Dense::new(graph, 4, 1, Activation::Linear, None)?.forward(&x)?;
    }
    Ok(x)
}
