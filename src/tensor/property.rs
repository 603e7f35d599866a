/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 本类仅包含一些属性方法与数据访问，不包含任何运算方法
 */

use super::Tensor;
use ndarray::{ArrayD, ArrayViewD};

impl Tensor {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓快照/view(_mut)↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }
    pub fn as_array(&self) -> &ArrayD<f32> {
        &self.data
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑快照/view(_mut)↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 以切片形式访问数据（内部始终为标准布局）
    pub fn data_as_slice(&self) -> &[f32] {
        self.data.as_slice().unwrap_or(&[])
    }

    /// 所有元素的平方和（用于L2正则项）
    pub fn sum_of_squares(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }
}
