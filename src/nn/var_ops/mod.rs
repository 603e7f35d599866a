/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Var 扩展 trait 模块
 *
 * 按功能领域组织 Var 的扩展方法，用户按需 import。
 *
 * # 模块结构
 * - `activation`: 激活函数（relu, sigmoid, tanh, 按名称/枚举激活）
 * - `merge`: 多分支合并（逐元素相加）
 * - `pool`: 平均池化、dropout
 * - `shape`: 形状变换（flatten）
 *
 * 构图失败（形状不符等）一律返回 `GraphError`，不会 panic。
 */

mod activation;
mod merge;
mod pool;
mod shape;

pub use activation::VarActivationOps;
pub use merge::VarMergeOps;
pub use pool::VarPoolOps;
pub use shape::VarShapeOps;
