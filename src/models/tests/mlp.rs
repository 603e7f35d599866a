/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : create_mlp 以及 Model 的基本约束
 */

use crate::assert_err;
use crate::models::create_mlp;
use crate::nn::{Adam, Graph, GraphError, Model, VarActivationOps};
use crate::tensor::Tensor;
use crate::utils::test_support::test_device;

#[test]
fn test_mlp_regression() -> Result<(), GraphError> {
    let model = create_mlp(test_device(), 10, true)?;
    assert_eq!(model.name(), "mlp");
    assert_eq!(model.output_shape()?, vec![1]);
    // 88 + 144 + 68 + 5
    assert_eq!(model.total_params(), 305);
    assert_eq!(model.non_trainable_params(), 0);
    assert_eq!(
        model.layer_names(),
        vec![
            "input",
            "dense_1",
            "dense_1_relu",
            "dense_2",
            "dense_2_relu",
            "dense_3",
            "dense_3_relu",
            "dense_4",
        ]
    );
    assert_eq!(model.optimizer(), Some(&Adam::default()));

    let y = model.predict(&Tensor::ones(&[5, 10]))?;
    assert_eq!(y.shape(), &[5, 1]);
    Ok(())
}

#[test]
fn test_mlp_classification_head() -> Result<(), GraphError> {
    let model = create_mlp(test_device(), 3, false)?;
    assert_eq!(model.output_shape()?, vec![4]);
    assert_eq!(model.total_params(), 32 + 144 + 68);
    // relu 输出非负
    let y = model.predict(&Tensor::new(&[1., -2., 3.], &[1, 3]))?;
    assert!(y.data_as_slice().iter().all(|&v| v >= 0.0));

    assert_err!(create_mlp(test_device(), 0, true), GraphError::ValueMustSatisfyComparison { .. });
    Ok(())
}

#[test]
fn test_model_requires_input_node() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&[2], None)?;
    let h = x.relu()?;
    let y = h.tanh()?;
    assert_err!(Model::new(h, y.clone()), GraphError::InvalidOperation(_));

    let other = Graph::new().input(&[2], None)?;
    assert_err!(Model::new(other, y), GraphError::InvalidOperation(_));
    Ok(())
}

#[test]
fn test_model_compile_validates_optimizer() -> Result<(), GraphError> {
    let mut model = create_mlp(test_device(), 4, true)?;
    let bad = Adam {
        beta1: 1.0,
        ..Adam::default()
    };
    assert_err!(model.compile(bad), GraphError::InvalidConfig(_));
    assert_err!(Adam::new(0.0), GraphError::InvalidConfig(_));
    model.compile(Adam::new(1e-2)?)?;
    assert_eq!(model.optimizer().map(|a| a.learning_rate), Some(1e-2));
    Ok(())
}

#[test]
fn test_forward_train_restores_mode() -> Result<(), GraphError> {
    let model = create_mlp(test_device(), 2, true)?;
    let x = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    let y = model.forward_train(&x)?;
    assert_eq!(y.shape(), &[2, 1]);
    // 恢复为训练前的模式（默认训练模式）
    assert!(!model.graph().is_eval());

    model.graph().set_eval_mode();
    model.forward_train(&x)?;
    assert!(model.graph().is_eval());
    assert_err!(model.forward_train(&Tensor::zeros(&[2, 3])));
    assert!(model.graph().is_eval());
    assert!(format!("{model:?}").contains("Graph"));
    Ok(())
}
