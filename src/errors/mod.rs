/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 张量错误类型与比较运算符
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}不符")]
    DataLengthMismatch { data_len: usize, shape: Vec<usize> },
}
