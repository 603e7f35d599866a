/*
 * @Author       : 老董
 * @Date         : 2026-03-09
 * @Description  : GraphInner / Graph 基础行为：命名、模式、检查点与回滚
 */

use crate::assert_err;
use crate::nn::{Graph, GraphError, GraphInner, Init, NodeId, Padding, VarActivationOps};

#[test]
fn test_graph_creation() {
    let graph = GraphInner::new();
    assert_eq!(graph.name(), "default_graph");
    assert_eq!(graph.nodes_count(), 0);
    assert!(!graph.has_seed());

    let named_graph = GraphInner::with_name_and_seed("custom_graph", 7);
    assert_eq!(named_graph.name(), "custom_graph");
    assert!(named_graph.has_seed());
}

#[test]
fn test_graph_mode() {
    let mut graph = GraphInner::new();
    assert!(graph.is_train_mode());

    graph.set_eval_mode();
    assert!(!graph.is_train_mode());

    // mode_scope 结束后恢复原模式
    graph.set_train_mode();
    let inside = graph.mode_scope(false, |g| g.is_train_mode());
    assert!(!inside);
    assert!(graph.is_train_mode());

    // 失败的闭包同样恢复原模式
    graph.set_eval_mode();
    let result: Result<(), GraphError> = graph.mode_scope(true, |g| {
        assert!(g.is_train_mode());
        Err(GraphError::InvalidOperation("失败".to_string()))
    });
    assert_err!(result, GraphError::InvalidOperation(_));
    assert!(!graph.is_train_mode());
}

#[test]
fn test_node_ids_are_monotonic_from_one() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[3, 4, 4], None)?;
    let k = graph.new_parameter_node(&[2, 3, 3, 3], &Init::Ones, true, None, None)?;
    assert_eq!(x, NodeId(1));
    assert_eq!(k, NodeId(2));
    assert_eq!(graph.nodes(), vec![NodeId(1), NodeId(2)]);
    Ok(())
}

#[test]
fn test_auto_and_duplicate_names() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let x1 = graph.new_input_node(&[2], None)?;
    let x2 = graph.new_input_node(&[2], None)?;
    assert_eq!(graph.get_node_name(x1)?, "input_1");
    assert_eq!(graph.get_node_name(x2)?, "input_2");

    graph.new_input_node(&[2], Some("duplicate"))?;
    let before = graph.nodes_count();
    assert_err!(
        graph.new_input_node(&[2], Some("duplicate")),
        GraphError::DuplicateNodeName(_)
    );
    // 失败的创建不会占用 ID
    assert_eq!(graph.nodes_count(), before);
    let next = graph.new_input_node(&[2], None)?;
    assert_eq!(next, NodeId(4));
    Ok(())
}

#[test]
fn test_layer_name_skips_taken_param_names() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    graph.new_parameter_node(&[1], &Init::Zeros, true, None, Some("conv2d_1_K"))?;
    let name = graph.generate_valid_layer_name(None, "conv2d", &["_K", "_b"])?;
    assert_eq!(name, "conv2d_2");

    assert_err!(
        graph.generate_valid_layer_name(Some("conv2d_1"), "conv2d", &["_K", "_b"]),
        GraphError::DuplicateNodeName(_)
    );
    Ok(())
}

#[test]
fn test_node_not_found() {
    let graph = GraphInner::new();
    let invalid_id = NodeId(999);
    assert_err!(
        graph.get_node_value(invalid_id),
        GraphError::NodeNotFound(id) if *id == invalid_id
    );
}

#[test]
fn test_creation_error_is_fail_fast() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[3, 8, 8], Some("x"))?;
    // 卷积核输入通道为 2，与输入的 3 不符
    let k = graph.new_parameter_node(&[4, 2, 3, 3], &Init::Ones, true, None, Some("k"))?;
    assert_err!(
        graph.new_conv2d_node(x, k, None, (1, 1), Padding::Same, None),
        GraphError::ShapeMismatch { got, .. } if got == &[3, 8, 8]
    );
    Ok(())
}

#[test]
fn test_rollback_removes_nodes_edges_and_groups() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[4], Some("x"))?;
    let checkpoint = graph.checkpoint();

    let w = graph.new_parameter_node(&[4, 2], &Init::Ones, true, None, Some("w"))?;
    let y = graph.new_dense_node(x, w, None, Some("y"))?;
    graph.register_layer_group("y", "Dense", "4→2", vec![w, y]);
    assert_eq!(graph.get_node_children(x)?, vec![y]);

    graph.rollback(checkpoint);
    assert_eq!(graph.nodes(), vec![x]);
    assert!(graph.get_node_children(x)?.is_empty());
    assert!(graph.layer_groups().is_empty());

    // 回滚后名称可以复用，ID 则继续递增
    let w2 = graph.new_parameter_node(&[4, 2], &Init::Ones, true, None, Some("w"))?;
    assert_eq!(w2, NodeId(4));
    assert_err!(graph.get_node(w), GraphError::NodeNotFound(id) if *id == w);
    assert_err!(graph.get_node(y), GraphError::NodeNotFound(_));
    Ok(())
}

#[test]
fn test_handle_from_failed_atomic_stays_dangling() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[4], Some("x"))?;

    let mut leaked = None;
    let result: Result<(), GraphError> = graph.atomic(|| {
        leaked = Some(x.relu()?);
        graph.parameter(&[4], Init::Zeros, "x")?;
        Ok(())
    });
    assert_err!(result, GraphError::DuplicateNodeName(_));
    let leaked = leaked.ok_or_else(|| GraphError::InvalidOperation("relu 未创建".to_string()))?;

    // 回滚后新建节点不会占用旧句柄的 id
    let y = x.tanh()?;
    assert_ne!(y.node_id(), leaked.node_id());
    assert_err!(leaked.name(), GraphError::NodeNotFound(_));
    assert_err!(leaked.type_name(), GraphError::NodeNotFound(_));
    assert_eq!(y.type_name()?, "Activation");
    Ok(())
}

#[test]
fn test_atomic_rolls_back_on_error() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[4], Some("x"))?;
    let count = graph.nodes_count();

    let result: Result<(), GraphError> = graph.atomic(|| {
        graph.parameter(&[4, 2], Init::Ones, "w")?;
        graph.parameter(&[4, 2], Init::Ones, "w")?;
        Ok(())
    });
    assert_err!(result, GraphError::DuplicateNodeName(_));
    assert_eq!(graph.nodes_count(), count);
    assert!(graph.find("w").is_none());
    assert!(graph.find("x").is_some_and(|v| v.node_id() == x.node_id()));
    Ok(())
}

#[test]
fn test_seeded_graphs_init_identically() -> Result<(), GraphError> {
    let g1 = Graph::new_with_seed(3);
    let g2 = Graph::new_with_seed(3);
    let p1 = g1.parameter(&[4, 3, 3, 3], Init::HeNormal, "k")?;
    let p2 = g2.parameter(&[4, 3, 3, 3], Init::HeNormal, "k")?;
    assert_eq!(p1.value()?, p2.value()?);
    Ok(())
}
