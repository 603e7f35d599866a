/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 负责神经网络（neural network）的构建：计算图、层、模型
 */

mod activation;
mod descriptor;
mod graph;
pub mod layer;
mod model;
mod module;
mod nodes;
mod optimizer;
mod regularizer;
mod shape;
mod var;
mod var_ops;

pub use activation::Activation;
pub use descriptor::{GraphDescriptor, NodeDescriptor, NodeTypeDescriptor};
pub use graph::{
    Graph, GraphCheckpoint, GraphError, GraphInner, GroupKind, ImageFormat, LayerGroup,
    VisualizationOutput,
};
pub use layer::{AvgPool2d, BatchNorm, Conv2d, Dense, Dropout};
pub use model::Model;
pub use module::Module;
pub use nodes::NodeId;
pub use optimizer::Adam;
pub use regularizer::Regularizer;
pub use shape::{Padding, format_batched_shape};
pub use var::{Init, Var};
pub use var_ops::{VarActivationOps, VarMergeOps, VarPoolOps, VarShapeOps};

#[cfg(test)]
mod tests;
