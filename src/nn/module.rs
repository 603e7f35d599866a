/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Module trait 定义
 */

use super::Var;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回 `Vec<Var>`（签名一致，放入 trait）
/// - 由于 Var 携带图引用，`forward()` 不需要 `&Graph` 参数
pub trait Module {
    /// 获取所有参数节点（含不可训练的，如 BatchNorm 的滑动统计量）
    fn parameters(&self) -> Vec<Var>;

    /// 参数张量个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 参数元素总数
    fn param_count(&self) -> usize {
        self.parameters()
            .iter()
            .filter_map(|p| p.shape().ok())
            .map(|shape| shape.iter().product::<usize>())
            .sum()
    }
}
