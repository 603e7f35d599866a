/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : Graph 模块的错误类型和可视化相关类型
 */

use crate::errors::ComparisonOperator;
use crate::nn::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
///
/// 构图阶段的错误一律立即返回（fail-fast），调用方修正配置后重新构图
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("节点{0}不存在")]
    NodeNotFound(NodeId),
    #[error("非法操作: {0}")]
    InvalidOperation(String),
    #[error("配置错误: {0}")]
    InvalidConfig(String),
    #[error("配置错误: {value_name}须{operator}{threshold}，得到{got}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
        got: usize,
    },
    #[error("未知的激活函数: {0}")]
    UnknownActivation(String),
    #[error("形状不匹配: {message}（期望{expected:?}，得到{got:?}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("维度不匹配: {message}（期望{expected}，得到{got}）")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        message: String,
    },
    #[error("节点名重复: {0}")]
    DuplicateNodeName(String),
    #[error("计算错误: {0}")]
    ComputationError(String),
    #[error("IO错误: {0}")]
    Io(String),
}

impl From<std::io::Error> for GraphError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl GraphError {
    /// 校验 `value >= threshold`
    pub(crate) fn check_at_least(
        value_name: &str,
        value: usize,
        threshold: usize,
    ) -> Result<(), Self> {
        if value >= threshold {
            Ok(())
        } else {
            Err(Self::ValueMustSatisfyComparison {
                value_name: value_name.to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold,
                got: value,
            })
        }
    }
}

// ========== 可视化相关类型 ==========

/// 图像输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG 格式（默认）
    #[default]
    Png,
    /// SVG 矢量格式
    Svg,
    /// PDF 格式
    Pdf,
}

impl ImageFormat {
    /// 获取文件扩展名（不含点号）
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

/// 可视化输出结果
#[derive(Debug)]
pub struct VisualizationOutput {
    /// DOT 文件路径（始终生成）
    pub dot_path: std::path::PathBuf,
    /// 图像文件路径（仅当 Graphviz 可用时生成）
    pub image_path: Option<std::path::PathBuf>,
    /// Graphviz 是否可用
    pub graphviz_available: bool,
    /// 如果 Graphviz 不可用，提供安装提示
    pub graphviz_hint: Option<String>,
}
