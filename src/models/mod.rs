/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 网络结构构建：ResNet v1 与 MLP
 *
 * 三级组合，逐级依赖：
 * - `res_layer`: 卷积/归一化/激活单元（或其预激活变体）
 * - `res_block_v1`: 若干残差单元串联，每个单元 = 变换路径 + 跳连路径相加
 * - `create_resnet_v1`: 输入级 + 三个 stage + 池化/全连接头部
 *
 * 每次组合调用都是原子的：失败时图回滚到调用前的状态。
 */

mod mlp;
mod naming;
mod res_block;
mod res_layer;
mod resnet;

pub use mlp::create_mlp;
pub use naming::sub_name;
pub use res_block::res_block_v1;
pub use res_layer::{LayerConfig, parse_activation, res_layer};
pub use resnet::{RESNET_STAGES, create_resnet_v1};

#[cfg(test)]
mod tests;
