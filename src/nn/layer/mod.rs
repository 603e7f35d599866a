/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Layer 模块 - 组合 Node 构建常见网络层
 *
 * 每个层在 `new` 时创建自己的参数节点，在 `forward` 时创建运算节点，
 * 并把这些节点注册为一个层分组（用于可视化）。
 *
 * 命名约定：层名为 `name`（缺省时自动生成，如 `conv2d_1`），
 * 运算节点即以层名命名，参数节点命名为 `{层名}_{参数}`。
 */

mod avg_pool2d;
mod batch_norm;
mod conv2d;
mod dense;
mod dropout;

pub use avg_pool2d::AvgPool2d;
pub use batch_norm::BatchNorm;
pub use conv2d::Conv2d;
pub use dense::Dense;
pub use dropout::Dropout;
