/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : create_resnet_v1：整体形状、参数量、命名确定性与推理
 */

use crate::assert_err;
use crate::models::{RESNET_STAGES, create_resnet_v1};
use crate::nn::{GraphError, NodeTypeDescriptor};
use crate::tensor::Tensor;
use crate::utils::test_support::test_device;

fn shape_of(model: &crate::nn::Model, name: &str) -> Result<Vec<usize>, GraphError> {
    model
        .graph()
        .find(name)
        .ok_or_else(|| GraphError::InvalidOperation(format!("找不到{name}")))?
        .shape()
}

#[test]
fn test_resnet_regression_param_totals() -> Result<(), GraphError> {
    let model = create_resnet_v1(test_device(), 32, 32, 3, true)?;
    assert_eq!(model.name(), "resnet_v1");
    assert_eq!(model.input_shape()?, vec![3, 32, 32]);
    assert_eq!(model.output_shape()?, vec![1]);
    assert_eq!(model.total_params(), 274_969);
    assert_eq!(model.trainable_params(), 273_561);
    assert_eq!(model.non_trainable_params(), 1_408);
    assert!(model.optimizer().is_some());

    let summary = model.summary_string();
    assert!(summary.contains("总参数量: 274,969"));
    assert!(summary.contains("不可训练参数: 1,408"));
    Ok(())
}

#[test]
fn test_resnet_stage_shapes() -> Result<(), GraphError> {
    let model = create_resnet_v1(test_device(), 32, 32, 3, false)?;
    assert_eq!(model.output_shape()?, vec![4]);
    assert_eq!(model.total_params(), 274_964);

    assert_eq!(shape_of(&model, "Inpt_relu")?, vec![16, 32, 32]);
    let expected = [vec![16, 32, 32], vec![32, 16, 16], vec![64, 8, 8]];
    for ((stage, _, _), shape) in RESNET_STAGES.iter().zip(expected) {
        assert_eq!(shape_of(&model, &format!("{stage}_Blk3_relu"))?, shape);
    }
    assert_eq!(shape_of(&model, "AvgPool")?, vec![64, 1, 1]);
    assert_eq!(shape_of(&model, "flatten_1")?, vec![64]);
    assert_eq!(shape_of(&model, "dense_1_relu")?, vec![16]);
    assert_eq!(shape_of(&model, "dense_2_relu")?, vec![4]);
    assert!(model.graph().find("dense_3").is_none());
    Ok(())
}

#[test]
fn test_resnet_merge_shapes_agree() -> Result<(), GraphError> {
    let model = create_resnet_v1(test_device(), 32, 32, 3, true)?;
    let desc = model.describe();
    let adds: Vec<_> = desc
        .nodes
        .iter()
        .filter(|n| matches!(n.node_type, NodeTypeDescriptor::Add))
        .collect();
    assert_eq!(adds.len(), 9);
    for add in adds {
        assert!(add.name.ends_with("_add"));
        for parent in &add.parents {
            let parent = desc
                .nodes
                .iter()
                .find(|n| n.id == *parent)
                .ok_or(GraphError::InvalidOperation(add.name.clone()))?;
            assert_eq!(parent.output_shape, add.output_shape);
        }
    }
    // 只有下采样 stage 的第一个单元使用投影
    let projections: Vec<_> = desc
        .nodes
        .iter()
        .filter(|n| n.name.ends_with("_lin_conv"))
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(projections, vec!["Stg2_Blk1_lin_conv", "Stg3_Blk1_lin_conv"]);
    Ok(())
}

#[test]
fn test_resnet_is_deterministic() -> Result<(), GraphError> {
    let m1 = create_resnet_v1(test_device(), 32, 32, 3, true)?;
    let m2 = create_resnet_v1(test_device(), 32, 32, 3, true)?;
    assert_eq!(m1.layer_names(), m2.layer_names());

    // 逐节点的名称、形状与连接关系一致
    let progression = |m: &crate::nn::Model| {
        m.describe()
            .nodes
            .into_iter()
            .map(|n| (n.name, n.output_shape, n.parents))
            .collect::<Vec<_>>()
    };
    let p1 = progression(&m1);
    assert_eq!(p1, progression(&m2));
    assert_eq!(p1.len(), m1.graph().nodes_count());
    // 设备上下文带种子，初始化结果一致
    let k1 = m1.graph().find("Stg3_Blk2_Res1_conv_K").map(|v| v.value());
    let k2 = m2.graph().find("Stg3_Blk2_Res1_conv_K").map(|v| v.value());
    assert_eq!(k1, k2);
    Ok(())
}

#[test]
fn test_resnet_predict() -> Result<(), GraphError> {
    let model = create_resnet_v1(test_device(), 32, 32, 3, true)?;
    let x = Tensor::normal(0.0, 1.0, &[2, 3, 32, 32]);
    let y = model.predict(&x)?;
    assert_eq!(y.shape(), &[2, 1]);
    assert!(y.data_as_slice().iter().all(|v| v.is_finite()));
    // 推理模式下结果可复现
    assert_eq!(model.predict(&x)?, y);
    assert!(!model.graph().is_eval());

    assert_err!(
        model.predict(&Tensor::zeros(&[2, 3, 16, 16])),
        GraphError::ShapeMismatch { .. }
    );
    Ok(())
}

#[test]
fn test_resnet_input_constraints() -> Result<(), GraphError> {
    // 两次下采样后须仍不小于 8×8 池化窗口
    let model = create_resnet_v1(test_device(), 29, 29, 1, true)?;
    assert_eq!(model.output_shape()?, vec![1]);
    assert_eq!(model.graph().find("Stg3_Blk3_relu").map(|v| v.shape()), Some(Ok(vec![64, 8, 8])));

    assert_err!(create_resnet_v1(test_device(), 28, 32, 3, true), GraphError::ShapeMismatch { .. });
    assert_err!(
        create_resnet_v1(test_device(), 32, 32, 0, true),
        GraphError::ValueMustSatisfyComparison { .. }
    );
    Ok(())
}
