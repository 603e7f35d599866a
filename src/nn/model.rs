/*
 * @Author       : 老董
 * @Date         : 2026-03-07
 * @Description  : Model：输入句柄 + 输出句柄 + 隐含的参数集合
 *
 * 类似 Keras 的 `Model(inputs, outputs)`：构图完成后打包，
 * 提供推理入口、参数统计和保存/加载。
 */

use super::descriptor::GraphDescriptor;
use super::{Adam, Graph, GraphError, Var};
use crate::tensor::Tensor;
use std::path::Path;

#[derive(Debug)]
pub struct Model {
    graph: Graph,
    input: Var,
    output: Var,
    optimizer: Option<Adam>,
}

impl Model {
    /// 打包模型：输入、输出必须来自同一张图，且输入必须是输入节点
    pub fn new(input: Var, output: Var) -> Result<Self, GraphError> {
        input.check_same_graph(&output)?;
        if input.type_name()? != "Input" {
            return Err(GraphError::InvalidOperation(format!(
                "模型的输入须为输入节点，得到{}节点{}",
                input.type_name()?,
                input.name()?
            )));
        }
        let graph = input.get_graph();
        let model = Self {
            graph,
            input,
            output,
            optimizer: None,
        };
        tracing::info!(
            "模型{}构建完成：输入{:?}，输出{:?}，参数{}（可训练{}）",
            model.name(),
            model.input_shape()?,
            model.output_shape()?,
            model.total_params(),
            model.trainable_params()
        );
        Ok(model)
    }

    /// 附加优化器配置
    pub fn compile(&mut self, optimizer: Adam) -> Result<(), GraphError> {
        optimizer.validate()?;
        self.optimizer = Some(optimizer);
        Ok(())
    }

    pub const fn optimizer(&self) -> Option<&Adam> {
        self.optimizer.as_ref()
    }

    // ==================== 推理 ====================

    /// 推理：推理模式下前向传播，`x` 的形状须为 [N, ...input_shape]
    pub fn predict(&self, x: &Tensor) -> Result<Tensor, GraphError> {
        self.run(x, false)
    }

    /// 训练模式前向：BatchNorm 使用 batch 统计量并更新滑动统计量，Dropout 生效
    pub fn forward_train(&self, x: &Tensor) -> Result<Tensor, GraphError> {
        self.run(x, true)
    }

    fn run(&self, x: &Tensor, is_train: bool) -> Result<Tensor, GraphError> {
        self.graph.run_in_mode(&[(&self.input, x)], &self.output, is_train)
    }

    // ==================== 访问器 ====================

    pub fn name(&self) -> String {
        self.graph.name()
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn input(&self) -> &Var {
        &self.input
    }

    pub const fn output(&self) -> &Var {
        &self.output
    }

    /// 单样本输入形状
    pub fn input_shape(&self) -> Result<Vec<usize>, GraphError> {
        self.input.shape()
    }

    /// 单样本输出形状
    pub fn output_shape(&self) -> Result<Vec<usize>, GraphError> {
        self.output.shape()
    }

    pub fn total_params(&self) -> usize {
        self.graph.total_params()
    }

    pub fn trainable_params(&self) -> usize {
        self.graph.trainable_params()
    }

    pub fn non_trainable_params(&self) -> usize {
        self.graph.non_trainable_params()
    }

    /// 所有运算节点的名称（拓扑序，不含参数节点）
    pub fn layer_names(&self) -> Vec<String> {
        self.graph
            .describe()
            .nodes
            .into_iter()
            .filter(|n| !matches!(n.node_type, super::NodeTypeDescriptor::Parameter { .. }))
            .map(|n| n.name)
            .collect()
    }

    /// 所有参数正则项之和
    pub fn regularization_penalty(&self) -> f32 {
        self.graph.inner().regularization_penalty()
    }

    pub fn describe(&self) -> GraphDescriptor {
        self.graph.describe()
    }

    pub fn summary(&self) {
        self.graph.summary();
    }

    pub fn summary_string(&self) -> String {
        self.graph.summary_string()
    }

    // ==================== 保存/加载 ====================

    /// 保存模型（`{path}.json` + `{path}.bin`）
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.graph.save_model(path)
    }

    /// 加载参数到结构相同的模型
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.graph.load_model(path)
    }
}
