/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Graph 句柄（用户级 API）
 */

use super::error::{GraphError, ImageFormat, VisualizationOutput};
use super::inner::GraphInner;
use super::types::GraphCheckpoint;
use crate::nn::descriptor::GraphDescriptor;
use crate::nn::var::{Init, Var};
use crate::nn::{NodeId, Regularizer};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Graph - 计算图句柄
///
/// # 设计原则
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装
/// - Clone 语义：多个 Graph 引用同一个 GraphInner
/// - 创建的 Var 自动持有图引用
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Graph")
            .field("name", &inner.name())
            .field("nodes", &inner.nodes_count())
            .finish()
    }
}

impl Graph {
    // ==================== 创建 ====================

    /// 创建新图
    pub fn new() -> Self {
        Self::from_inner(GraphInner::new())
    }

    /// 创建带种子的图（参数初始化、dropout 可复现）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_inner(GraphInner::new_with_seed(seed))
    }

    /// 创建带名称的图，种子可选
    pub fn with_name(name: &str, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_inner(GraphInner::with_name_and_seed(name, seed)),
            None => Self::from_inner(GraphInner::with_name(name)),
        }
    }

    /// 从现有 GraphInner 创建句柄
    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) const fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    /// 获取内部 GraphInner 的不可变引用
    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    /// 获取内部 GraphInner 的可变引用
    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    /// 将 NodeId 包装成 Var
    pub fn wrap_node_id(&self, node_id: NodeId) -> Var {
        Var::new(node_id, Rc::clone(&self.inner))
    }

    /// 检查 Var 是否属于本图
    pub fn owns(&self, var: &Var) -> bool {
        Rc::ptr_eq(&self.inner, var.graph())
    }

    // ==================== 创建变量 ====================

    /// 创建输入节点（`shape` 为单样本形状，不含 batch 维）
    pub fn input(&self, shape: &[usize], name: Option<&str>) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_input_node(shape, name)?;
        Ok(self.wrap_node_id(node_id))
    }

    /// 创建可训练、无正则项的参数节点
    pub fn parameter(&self, shape: &[usize], init: Init, name: &str) -> Result<Var, GraphError> {
        self.parameter_with(shape, init, true, None, name)
    }

    /// 创建参数节点（完整选项）
    pub fn parameter_with(
        &self,
        shape: &[usize],
        init: Init,
        trainable: bool,
        regularizer: Option<Regularizer>,
        name: &str,
    ) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_parameter_node(
            shape,
            &init,
            trainable,
            regularizer,
            Some(name),
        )?;
        Ok(self.wrap_node_id(node_id))
    }

    // ==================== 执行 ====================

    /// 前向传播（输入节点须已设置值）
    pub fn forward(&self, output: &Var) -> Result<(), GraphError> {
        self.inner.borrow_mut().forward(output.node_id())
    }

    /// 设置输入后前向传播，并返回输出值（使用图的当前模式）
    pub fn run(&self, feeds: &[(&Var, &Tensor)], output: &Var) -> Result<Tensor, GraphError> {
        let is_train = !self.is_eval();
        self.run_in_mode(feeds, output, is_train)
    }

    /// 在指定模式下运行`run`，结束后恢复图原来的模式
    pub fn run_in_mode(
        &self,
        feeds: &[(&Var, &Tensor)],
        output: &Var,
        is_train: bool,
    ) -> Result<Tensor, GraphError> {
        self.inner.borrow_mut().mode_scope(is_train, |g| -> Result<Tensor, GraphError> {
            for (var, value) in feeds {
                g.set_node_value(var.node_id(), Some(value))?;
            }
            g.forward(output.node_id())?;
            g.get_node_value(output.node_id())?
                .cloned()
                .ok_or(GraphError::NodeNotFound(output.node_id()))
        })
    }

    /// 切换到训练模式
    pub fn set_train_mode(&self) {
        self.inner.borrow_mut().set_train_mode();
    }

    /// 切换到推理模式
    pub fn set_eval_mode(&self) {
        self.inner.borrow_mut().set_eval_mode();
    }

    pub fn is_eval(&self) -> bool {
        !self.inner.borrow().is_train_mode()
    }

    // ==================== 构图事务 ====================

    /// 记录当前状态
    pub fn checkpoint(&self) -> GraphCheckpoint {
        self.inner.borrow().checkpoint()
    }

    /// 回滚到检查点
    pub fn rollback(&self, checkpoint: GraphCheckpoint) {
        self.inner.borrow_mut().rollback(checkpoint);
    }

    /// 原子构图：`f` 返回错误时，删除其间创建的全部节点和分组
    ///
    /// # 使用示例
    /// ```ignore
    /// let y = graph.atomic(|| {
    ///     let h = conv.forward(&x)?;
    ///     bn.forward(&h)
    /// })?;
    /// ```
    pub fn atomic<T, F>(&self, f: F) -> Result<T, GraphError>
    where
        F: FnOnce() -> Result<T, GraphError>,
    {
        let checkpoint = self.checkpoint();
        let result = f();
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    /// 将`since`之后创建的全部节点注册为一个模块级分组（用于可视化）
    pub fn register_block_group(
        &self,
        name: &str,
        layer_type: &str,
        description: &str,
        since: GraphCheckpoint,
    ) {
        self.inner
            .borrow_mut()
            .register_block_group(name, layer_type, description, since);
    }

    // ==================== 统计与描述 ====================

    pub fn name(&self) -> String {
        self.inner.borrow().name().to_string()
    }

    pub fn nodes_count(&self) -> usize {
        self.inner.borrow().nodes_count()
    }

    /// 按名称查找节点
    pub fn find(&self, name: &str) -> Option<Var> {
        let id = self.inner.borrow().find_node_by_name(name)?;
        Some(self.wrap_node_id(id))
    }

    pub fn total_params(&self) -> usize {
        self.inner.borrow().total_params()
    }

    pub fn trainable_params(&self) -> usize {
        self.inner.borrow().trainable_params()
    }

    pub fn non_trainable_params(&self) -> usize {
        let g = self.inner.borrow();
        g.total_params() - g.trainable_params()
    }

    pub fn describe(&self) -> GraphDescriptor {
        self.inner.borrow().describe()
    }

    /// 打印模型摘要
    pub fn summary(&self) {
        self.inner.borrow().summary();
    }

    pub fn summary_string(&self) -> String {
        self.inner.borrow().summary_string()
    }

    pub fn summary_markdown(&self) -> String {
        self.inner.borrow().summary_markdown()
    }

    pub fn save_summary<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.inner.borrow().save_summary(path)
    }

    // ==================== 可视化 ====================

    pub fn to_dot(&self) -> String {
        self.inner.borrow().to_dot()
    }

    /// 保存计算图可视化（`.dot` + 可选图像）
    pub fn save_visualization<P: AsRef<Path>>(
        &self,
        base_path: P,
        format: Option<ImageFormat>,
    ) -> Result<VisualizationOutput, GraphError> {
        self.inner.borrow().save_visualization(base_path, format)
    }

    // ==================== 保存/加载 ====================

    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.inner.borrow().save_params(path)
    }

    pub fn load_params<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.inner.borrow_mut().load_params(path)
    }

    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.inner.borrow().save_model(path)
    }

    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.inner.borrow_mut().load_model(path)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
