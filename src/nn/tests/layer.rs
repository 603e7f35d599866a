/*
 * @Author       : 老董
 * @Date         : 2026-03-09
 * @Description  : 带参数的层：命名、参数形状与数量、层分组
 */

use crate::assert_err;
use crate::nn::layer::{Conv2d, Dense};
use crate::nn::{Activation, Graph, GraphError, GroupKind, Module, Padding, Regularizer};

#[test]
fn test_conv2d_layer_params() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[3, 32, 32], Some("input"))?;
    let conv = Conv2d::new(
        &graph,
        3,
        16,
        (3, 3),
        (1, 1),
        Padding::Same,
        true,
        Some(Regularizer::L2(1e-4)),
        Some("Inpt_conv"),
    )?;
    assert_eq!(conv.kernel().name()?, "Inpt_conv_K");
    assert_eq!(conv.kernel().shape()?, vec![16, 3, 3, 3]);
    assert_eq!(conv.param_count(), 3 * 3 * 3 * 16 + 16);

    let y = conv.forward(&x)?;
    assert_eq!(y.name()?, "Inpt_conv");
    assert_eq!(y.shape()?, vec![16, 32, 32]);

    let groups = graph.inner().layer_groups().to_vec();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind, GroupKind::Layer);
    assert_eq!(groups[0].node_ids.len(), 3);
    Ok(())
}

#[test]
fn test_conv2d_layer_without_bias() -> Result<(), GraphError> {
    let graph = Graph::new();
    let conv = Conv2d::new(&graph, 16, 32, (1, 1), (2, 2), Padding::Same, false, None, None)?;
    assert!(conv.bias().is_none());
    assert_eq!(conv.param_count(), 16 * 32);
    assert_eq!(conv.name(), "conv2d_1");
    Ok(())
}

#[test]
fn test_conv2d_layer_invalid_config() {
    let graph = Graph::new();
    assert_err!(
        Conv2d::new(&graph, 3, 0, (3, 3), (1, 1), Padding::Same, true, None, None),
        GraphError::ValueMustSatisfyComparison { got: 0, .. }
    );
    assert_err!(
        Conv2d::new(&graph, 3, 8, (3, 3), (0, 0), Padding::Same, true, None, None),
        GraphError::ValueMustSatisfyComparison { .. }
    );
    assert_eq!(graph.nodes_count(), 0);
}

#[test]
fn test_regularization_penalty() -> Result<(), GraphError> {
    let graph = Graph::new();
    let conv = Conv2d::new(
        &graph,
        1,
        1,
        (1, 1),
        (1, 1),
        Padding::Same,
        true,
        Some(Regularizer::L2(0.5)),
        None,
    )?;
    conv.kernel().set_value(&crate::tensor::Tensor::new(&[2.0], &[1, 1, 1, 1]))?;
    // 0.5 · 2² ，偏置不带正则项
    approx::assert_abs_diff_eq!(graph.inner().regularization_penalty(), 2.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_dense_layer_names_and_count() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[10], None)?;
    let d1 = Dense::new(&graph, 10, 8, Activation::Relu, None)?;
    let h = d1.forward(&x)?;
    assert_eq!(d1.name(), "dense_1");
    assert_eq!(h.name()?, "dense_1_relu");
    assert_eq!(d1.param_count(), 10 * 8 + 8);

    let d2 = Dense::new(&graph, 8, 1, Activation::Linear, None)?;
    let y = d2.forward(&h)?;
    assert_eq!(y.name()?, "dense_2");
    assert_eq!(y.type_name()?, "Dense");
    assert_eq!(graph.total_params(), 88 + 9);
    Ok(())
}
