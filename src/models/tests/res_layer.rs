/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : 卷积单元 res_layer：两种顺序、命名、配置校验与失败回滚
 */

use crate::assert_err;
use crate::models::{LayerConfig, parse_activation, res_layer};
use crate::nn::{Activation, Graph, GraphError, Var};

fn parent_names(graph: &Graph, var: &Var) -> Result<Vec<String>, GraphError> {
    let inner = graph.inner();
    inner
        .get_node_parents(var.node_id())?
        .into_iter()
        .map(|id| inner.get_node_name(id).map(str::to_string))
        .collect()
}

#[test]
fn test_conv_first_layer() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(42);
    let x = graph.input(&[3, 32, 32], Some("input"))?;
    let y = res_layer(&x, &LayerConfig::new(16).name("Inpt"))?;

    assert_eq!(y.shape()?, vec![16, 32, 32]);
    assert_eq!(y.name()?, "Inpt_relu");
    // input + conv(K, b, op) + bn(4 个参数, op) + relu
    assert_eq!(graph.nodes_count(), 10);
    assert_eq!(graph.total_params(), 512);

    let bn = graph.find("Inpt_bn").ok_or(GraphError::InvalidOperation("Inpt_bn".into()))?;
    assert_eq!(parent_names(&graph, &bn)?[0], "Inpt_conv");
    assert_eq!(parent_names(&graph, &y)?, vec!["Inpt_bn"]);
    assert!(graph.find("Inpt_conv_K").is_some());
    assert!(graph.find("Inpt_bn_moving_var").is_some());
    Ok(())
}

#[test]
fn test_pre_activation_layer() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[8, 16, 16], Some("x"))?;
    let y = res_layer(&x, &LayerConfig::new(16).conv_first(false).name("L"))?;

    assert_eq!(y.shape()?, vec![16, 16, 16]);
    assert_eq!(y.name()?, "L_conv");
    // 归一化作用在输入通道上
    let gamma = graph.find("L_bn_gamma").ok_or(GraphError::InvalidOperation("L_bn_gamma".into()))?;
    assert_eq!(gamma.shape()?, vec![8]);
    assert_eq!(parent_names(&graph, &y)?[0], "L_relu");
    Ok(())
}

#[test]
fn test_strides_and_plain_conv() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[16, 15, 15], None)?;
    let before = graph.nodes_count();
    let y = res_layer(
        &x,
        &LayerConfig::new(32)
            .kernel_size(1)
            .strides(2)
            .activation(None)
            .batch_normalization(false),
    )?;
    assert_eq!(y.shape()?, vec![32, 8, 8]);
    assert_eq!(y.type_name()?, "Conv2d");
    assert_eq!(graph.nodes_count() - before, 3);
    assert_eq!(graph.total_params(), 16 * 32 + 32);
    Ok(())
}

#[test]
fn test_unlabeled_layers_get_auto_names() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[3, 8, 8], None)?;
    let y1 = res_layer(&x, &LayerConfig::new(4))?;
    let y2 = res_layer(&y1, &LayerConfig::new(4))?;
    assert_eq!(y1.name()?, "activation_1");
    assert_eq!(y2.name()?, "activation_2");
    assert!(graph.find("conv2d_2_K").is_some());
    assert!(graph.find("batch_norm_2").is_some());
    Ok(())
}

#[test]
fn test_activation_names() -> Result<(), GraphError> {
    assert_eq!(parse_activation("none")?, None);
    assert_eq!(parse_activation("Tanh")?, Some(Activation::Tanh));
    assert_err!(parse_activation("swish"), GraphError::UnknownActivation(name) if name == "swish");

    let config = LayerConfig::new(8).activation_name("sigmoid")?;
    assert_eq!(config.activation, Some(Activation::Sigmoid));
    assert_err!(LayerConfig::new(8).activation_name("gelu"), GraphError::UnknownActivation(_));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[3, 8, 8], None)?;
    assert_err!(
        res_layer(&x, &LayerConfig::new(0)),
        GraphError::ValueMustSatisfyComparison { got: 0, .. }
    );
    assert_err!(
        res_layer(&x, &LayerConfig::new(4).strides(0)),
        GraphError::ValueMustSatisfyComparison { .. }
    );

    let flat = graph.input(&[10], None)?;
    assert_err!(
        res_layer(&flat, &LayerConfig::new(4)),
        GraphError::DimensionMismatch { expected: 3, got: 1, .. }
    );
    assert_eq!(graph.nodes_count(), 2);
    Ok(())
}

#[test]
fn test_failure_rolls_back_partial_layer() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[3, 8, 8], None)?;
    // 占用激活节点的名字，使构建在 conv、bn 之后才失败
    graph.input(&[1], Some("L_relu"))?;
    let count = graph.nodes_count();
    let groups = graph.inner().layer_groups().len();

    assert_err!(
        res_layer(&x, &LayerConfig::new(4).name("L")),
        GraphError::DuplicateNodeName(_)
    );
    assert_eq!(graph.nodes_count(), count);
    assert_eq!(graph.inner().layer_groups().len(), groups);
    assert!(graph.find("L_conv").is_none());
    assert!(graph.inner().get_node_children(x.node_id())?.is_empty());
    Ok(())
}

#[test]
fn test_layer_config_serde_defaults() -> Result<(), serde_json::Error> {
    let config: LayerConfig = serde_json::from_str(r#"{"filters": 32, "activation": null}"#)?;
    assert_eq!(config.filters, 32);
    assert_eq!(config.kernel_size, 3);
    assert_eq!(config.activation, None);
    assert!(config.conv_first);
    assert_eq!(LayerConfig::default(), LayerConfig::new(16));
    Ok(())
}
