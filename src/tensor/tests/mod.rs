use crate::errors::TensorError;
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓shape↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
#[test]
fn test_compare_shapes_with_diff_shapes() {
    let tensor1 = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    let tensor2 = Tensor::new(&[1., 2., 3., 4.], &[4]);
    assert!(!tensor1.is_same_shape(&tensor2));
    assert_eq!(tensor1.size(), tensor2.size());
    assert_eq!(tensor1.dimension(), 2);
}

#[test]
fn test_try_new_with_wrong_length() {
    let err = Tensor::try_new(&[1., 2., 3.], &[2, 2]).unwrap_err();
    assert_eq!(
        err,
        TensorError::DataLengthMismatch {
            data_len: 3,
            shape: vec![2, 2]
        }
    );
}

#[test]
#[should_panic(expected = "数据长度3与形状[2, 2]不符")]
fn test_new_with_wrong_length_panics() {
    let _ = Tensor::new(&[1., 2., 3.], &[2, 2]);
}

#[test]
fn test_scalar() {
    let tensor = Tensor::new(&[1.], &[]);
    assert_eq!(tensor.dimension(), 0);
    assert_eq!(tensor.size(), 1);
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑shape↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

#[test]
fn test_from_non_standard_layout_array() {
    let arr = ndarray::ArrayD::from_shape_vec(ndarray::IxDyn(&[2, 3]), vec![1., 2., 3., 4., 5., 6.])
        .unwrap();
    let transposed = arr.reversed_axes();
    let tensor = Tensor::from_array(transposed);
    assert_eq!(tensor.shape(), &[3, 2]);
    assert_eq!(tensor.data_as_slice(), &[1., 4., 2., 5., 3., 6.]);
}

#[test]
fn test_normal_with_rng_is_reproducible() {
    let a = Tensor::normal_with_rng(0.0, 1.0, &[3, 5], &mut StdRng::seed_from_u64(7));
    let b = Tensor::normal_with_rng(0.0, 1.0, &[3, 5], &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
    assert!(a.data_as_slice().iter().all(|x| x.is_finite()));
}

#[test]
fn test_normal_statistics() {
    let t = Tensor::normal_with_rng(2.0, 0.5, &[20000], &mut StdRng::seed_from_u64(42));
    let n = t.size() as f32;
    let mean = t.data_as_slice().iter().sum::<f32>() / n;
    let var = t.data_as_slice().iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
    assert_abs_diff_eq!(mean, 2.0, epsilon = 0.05);
    assert_abs_diff_eq!(var.sqrt(), 0.5, epsilon = 0.05);
}

#[test]
fn test_uniform_with_rng_range() {
    let t = Tensor::uniform_with_rng(-0.5, 0.5, &[1000], &mut StdRng::seed_from_u64(1));
    assert!(t.data_as_slice().iter().all(|&x| (-0.5..0.5).contains(&x)));
}

#[test]
fn test_sum_of_squares() {
    let t = Tensor::new(&[1., -2., 3.], &[3]);
    assert_abs_diff_eq!(t.sum_of_squares(), 14.0);
    assert_abs_diff_eq!(Tensor::full(0.5, &[2, 2]).sum_of_squares(), 1.0);
}
