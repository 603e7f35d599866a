/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : 残差块 res_block_v1：跳连方式、形状、参数量与命名
 */

use crate::assert_err;
use crate::models::res_block_v1;
use crate::nn::{Graph, GraphError, GroupKind};

fn parent_shapes(graph: &Graph, name: &str) -> Result<Vec<Vec<usize>>, GraphError> {
    let inner = graph.inner();
    let id = inner
        .find_node_by_name(name)
        .ok_or_else(|| GraphError::InvalidOperation(format!("找不到{name}")))?;
    inner
        .get_node_parents(id)?
        .into_iter()
        .map(|p| inner.get_node_value_expected_shape(p).map(<[usize]>::to_vec))
        .collect()
}

#[test]
fn test_identity_block() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[16, 32, 32], Some("x"))?;
    let y = res_block_v1(&x, 16, 3, false, "Stg1")?;

    assert_eq!(y.shape()?, vec![16, 32, 32]);
    assert_eq!(y.name()?, "Stg1_Blk3_relu");
    assert_eq!(graph.total_params(), 14_304);
    for k in 1..=3 {
        assert!(graph.find(&format!("Stg1_Blk{k}_lin")).is_none());
    }

    // 第一个单元的跳连直接来自块输入
    let inner = graph.inner();
    let add = inner
        .find_node_by_name("Stg1_Blk1_add")
        .ok_or(GraphError::InvalidOperation("Stg1_Blk1_add".into()))?;
    let parents = inner.get_node_parents(add)?;
    assert_eq!(parents[0], x.node_id());
    assert_eq!(inner.get_node_name(parents[1])?, "Stg1_Blk1_Res2_bn");
    Ok(())
}

#[test]
fn test_downsample_block() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[16, 32, 32], Some("x"))?;
    let y = res_block_v1(&x, 32, 3, true, "Stg2")?;

    assert_eq!(y.shape()?, vec![32, 16, 16]);
    assert_eq!(graph.total_params(), 52_192);
    let lin = graph
        .find("Stg2_Blk1_lin_conv")
        .ok_or(GraphError::InvalidOperation("Stg2_Blk1_lin_conv".into()))?;
    assert_eq!(lin.shape()?, vec![32, 16, 16]);
    assert!(graph.find("Stg2_Blk1_lin_bn").is_none());
    assert!(graph.find("Stg2_Blk2_lin_conv").is_none());
    assert!(graph.find("Stg2_Blk3_lin_conv").is_none());

    for k in 1..=3 {
        let shapes = parent_shapes(&graph, &format!("Stg2_Blk{k}_add"))?;
        assert_eq!(shapes[0], shapes[1]);
    }
    Ok(())
}

#[test]
fn test_odd_input_downsample_shapes_agree() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[16, 15, 15], None)?;
    let y = res_block_v1(&x, 32, 1, true, "S")?;
    assert_eq!(y.shape()?, vec![32, 8, 8]);
    let shapes = parent_shapes(&graph, "S_Blk1_add")?;
    assert_eq!(shapes, vec![vec![32, 8, 8], vec![32, 8, 8]]);
    Ok(())
}

#[test]
fn test_channel_change_without_downsample_projects() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[3, 8, 8], None)?;
    let y = res_block_v1(&x, 16, 2, false, "S")?;
    assert_eq!(y.shape()?, vec![16, 8, 8]);
    let lin = graph
        .find("S_Blk1_lin_conv")
        .ok_or(GraphError::InvalidOperation("S_Blk1_lin_conv".into()))?;
    assert_eq!(lin.shape()?, vec![16, 8, 8]);
    assert!(graph.find("S_Blk2_lin_conv").is_none());
    Ok(())
}

#[test]
fn test_block_groups() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[16, 16, 16], None)?;
    res_block_v1(&x, 16, 2, false, "Stg1")?;

    let inner = graph.inner();
    let groups = inner.layer_groups();
    let unit = groups
        .iter()
        .find(|g| g.name == "Stg1_Blk2")
        .ok_or(GraphError::InvalidOperation("Stg1_Blk2".into()))?;
    assert_eq!(unit.kind, GroupKind::Block);
    assert_eq!(unit.layer_type, "ResUnit");

    let block = groups
        .iter()
        .find(|g| g.name == "Stg1")
        .ok_or(GraphError::InvalidOperation("Stg1".into()))?;
    assert_eq!(block.layer_type, "ResBlock");
    // 除输入外的所有节点
    assert_eq!(block.node_ids.len(), inner.nodes_count() - 1);
    Ok(())
}

#[test]
fn test_invalid_block_and_rollback() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[16, 8, 8], None)?;
    assert_err!(
        res_block_v1(&x, 16, 0, false, "S"),
        GraphError::ValueMustSatisfyComparison { got: 0, .. }
    );

    // 第二个单元的相加节点重名：第一个单元已建好的节点也须一并回滚
    graph.input(&[1], Some("S_Blk2_add"))?;
    let count = graph.nodes_count();
    assert_err!(res_block_v1(&x, 16, 3, false, "S"), GraphError::DuplicateNodeName(_));
    assert_eq!(graph.nodes_count(), count);
    assert!(graph.find("S_Blk1_add").is_none());
    assert!(graph.inner().layer_groups().is_empty());
    Ok(())
}
