/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 具体节点类型及其公共接口
 *
 * 约定：
 * - 节点创建时即根据父节点形状推导并校验自身输出形状（构图阶段 fail-fast）
 * - `calc_value` 收到的父节点值均带 batch 维度（参数节点除外）
 */

mod input;
mod ops;
mod parameter;

pub(crate) use input::Input;
pub(crate) use ops::*;
pub(crate) use parameter::Parameter;

use super::NodeHandle;
use crate::nn::GraphError;
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;
use ndarray::{ArrayView, Dimension};
use rand::rngs::StdRng;

#[enum_dispatch]
#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Conv2d(Conv2d),
    BatchNorm(BatchNorm),
    Activate(Activate),
    Add(Add),
    AvgPool2d(AvgPool2d),
    Flatten(Flatten),
    Dense(Dense),
    Dropout(Dropout),
}

#[enum_dispatch(NodeType)]
pub(crate) trait TraitNode {
    /// 类型名（用于摘要、可视化）
    fn type_name(&self) -> &'static str;

    /// 自动命名前缀，如 "conv2d" → "conv2d_1"
    fn name_prefix(&self) -> &'static str;

    /// 单样本输出形状
    fn output_shape(&self) -> &[usize];

    fn descriptor(&self) -> NodeTypeDescriptor;

    // 根据父节点的值计算本节点的值（父节点的值已由 Graph 预先算好）
    fn calc_value(
        &mut self,
        parents: &[&Tensor],
        is_train: bool,
        rng: &mut StdRng,
    ) -> Result<Tensor, GraphError>;

    /// 前向后需要写回父节点的状态（父节点下标, 新值），如 BatchNorm 的滑动统计量
    fn take_state_updates(&mut self) -> Vec<(usize, Tensor)> {
        Vec::new()
    }
}

/// 校验父节点数量
pub(in crate::nn::nodes) fn check_parent_count(
    parents: &[&NodeHandle],
    allowed: &[usize],
    op: &str,
) -> Result<(), GraphError> {
    if allowed.contains(&parents.len()) {
        Ok(())
    } else {
        Err(GraphError::InvalidOperation(format!(
            "{op} 节点需要 {allowed:?} 个父节点，得到 {}",
            parents.len()
        )))
    }
}

/// 校验某个父节点的单样本形状
pub(in crate::nn::nodes) fn check_shape(
    parent: &NodeHandle,
    expected: &[usize],
    op: &str,
) -> Result<(), GraphError> {
    let got = parent.value_expected_shape();
    if got == expected {
        Ok(())
    } else {
        Err(GraphError::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
            message: format!("{op} 的父节点 {} 形状不符", parent.name()),
        })
    }
}

/// 将带 batch 的张量视为固定维数的数组视图
pub(in crate::nn::nodes) fn batched_view<'a, D: Dimension>(
    t: &'a Tensor,
    op: &str,
) -> Result<ArrayView<'a, f32, D>, GraphError> {
    t.view().into_dimensionality::<D>().map_err(|_| {
        GraphError::ComputationError(format!("{op} 的输入维数不符: {:?}", t.shape()))
    })
}
