//! # resgraph
//!
//! `resgraph`用纯rust搭建ResNet（以及简单的MLP）的计算图：
//! 以符号张量（[`nn::Var`]）贯穿各个组合函数，在构图阶段即完成形状推导与参数统计，
//! 最后打包成[`nn::Model`]，可在CPU上做前向推理、打印摘要、导出DOT及保存/加载参数。
//!
//! 使用前须显式初始化一次设备上下文（[`device::DeviceContext::init`]）。

pub mod device;
pub mod errors;
pub mod models;
pub mod nn;
pub mod tensor;
pub mod utils;

pub use device::{DeviceConfig, DeviceContext, DeviceError};
pub use models::{create_mlp, create_resnet_v1, res_block_v1, res_layer, LayerConfig};
