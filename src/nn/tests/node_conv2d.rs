/*
 * @Author       : 老董
 * @Date         : 2026-03-09
 * @Description  : Conv2d 节点：形状推导与数值
 */

use crate::assert_err;
use crate::nn::{GraphError, GraphInner, Init, Padding};
use crate::tensor::Tensor;

#[test]
fn test_conv2d_same_padding_shapes() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[3, 32, 32], None)?;
    let k = graph.new_parameter_node(&[16, 3, 3, 3], &Init::Zeros, true, None, None)?;
    let y = graph.new_conv2d_node(x, k, None, (1, 1), Padding::Same, None)?;
    assert_eq!(graph.get_node_value_expected_shape(y)?, &[16, 32, 32]);

    // same 填充下 stride 2：ceil(32 / 2) = 16，ceil(15 / 2) = 8
    let y2 = graph.new_conv2d_node(x, k, None, (2, 2), Padding::Same, None)?;
    assert_eq!(graph.get_node_value_expected_shape(y2)?, &[16, 16, 16]);
    let x_odd = graph.new_input_node(&[3, 15, 15], None)?;
    let y3 = graph.new_conv2d_node(x_odd, k, None, (2, 2), Padding::Same, None)?;
    assert_eq!(graph.get_node_value_expected_shape(y3)?, &[16, 8, 8]);
    Ok(())
}

#[test]
fn test_conv2d_valid_padding_shapes() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[1, 7, 5], None)?;
    let k = graph.new_parameter_node(&[2, 1, 3, 3], &Init::Zeros, true, None, None)?;
    let y = graph.new_conv2d_node(x, k, None, (2, 1), Padding::Valid, None)?;
    assert_eq!(graph.get_node_value_expected_shape(y)?, &[2, 3, 3]);

    // 卷积核大于输入
    let big = graph.new_parameter_node(&[2, 1, 9, 9], &Init::Zeros, true, None, None)?;
    assert_err!(graph.new_conv2d_node(x, big, None, (1, 1), Padding::Valid, None));
    Ok(())
}

#[test]
fn test_conv2d_rejects_non_image_input() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[10], None)?;
    let k = graph.new_parameter_node(&[2, 1, 3, 3], &Init::Zeros, true, None, None)?;
    assert_err!(
        graph.new_conv2d_node(x, k, None, (1, 1), Padding::Same, None),
        GraphError::DimensionMismatch { expected: 3, got: 1, .. }
    );
    Ok(())
}

#[test]
fn test_conv2d_same_padding_values() -> Result<(), GraphError> {
    // 全 1 输入与全 1 卷积核：中心 9、边 6、角 4
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[1, 3, 3], Some("x"))?;
    let k = graph.new_parameter_node(&[1, 1, 3, 3], &Init::Ones, true, None, Some("k"))?;
    let b = graph.new_parameter_node(&[1], &Init::Constant(0.5), true, None, Some("b"))?;
    let y = graph.new_conv2d_node(x, k, Some(b), (1, 1), Padding::Same, None)?;

    graph.set_node_value(x, Some(&Tensor::ones(&[1, 1, 3, 3])))?;
    graph.forward(y)?;
    let out = graph.get_node_value(y)?.cloned().ok_or(GraphError::NodeNotFound(y))?;
    assert_eq!(out.shape(), &[1, 1, 3, 3]);
    let expected = [4., 6., 4., 6., 9., 6., 4., 6., 4.];
    for (got, want) in out.data_as_slice().iter().zip(expected) {
        approx::assert_abs_diff_eq!(*got, want + 0.5, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_conv2d_strided_values() -> Result<(), GraphError> {
    // 1×1 卷积、stride 2：取偶数位置像素并乘以权重
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[1, 4, 4], Some("x"))?;
    let k = graph.new_parameter_node(&[2, 1, 1, 1], &Init::Zeros, true, None, Some("k"))?;
    graph.set_node_value(k, Some(&Tensor::new(&[1., -2.], &[2, 1, 1, 1])))?;
    let y = graph.new_conv2d_node(x, k, None, (2, 2), Padding::Same, None)?;

    let data: Vec<f32> = (0..16).map(|v| v as f32).collect();
    graph.set_node_value(x, Some(&Tensor::new(&data, &[1, 1, 4, 4])))?;
    graph.forward(y)?;
    let out = graph.get_node_value(y)?.cloned().ok_or(GraphError::NodeNotFound(y))?;
    assert_eq!(out.shape(), &[1, 2, 2, 2]);
    assert_eq!(
        out.data_as_slice(),
        &[0., 2., 8., 10., 0., -4., -16., -20.]
    );
    Ok(())
}
