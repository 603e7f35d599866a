/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : GraphInner describe/summary 相关方法
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::descriptor::{GraphDescriptor, NodeDescriptor, NodeTypeDescriptor};
use crate::nn::format_batched_shape;
use std::path::Path;

impl GraphInner {
    // ========== 图描述（describe）==========

    /// 导出图的描述符（用于序列化、可视化、调试）
    ///
    /// # 示例
    /// ```ignore
    /// let descriptor = graph.describe();
    /// println!("{}", descriptor.to_json()?);
    /// ```
    pub fn describe(&self) -> GraphDescriptor {
        let mut descriptor = GraphDescriptor::new(&self.name);

        for node in self.nodes().into_iter().filter_map(|id| self.nodes.get(&id)) {
            let parents = self
                .backward_edges
                .get(&node.id())
                .map(|ids| ids.iter().map(|id| id.0).collect())
                .unwrap_or_default();

            descriptor.add_node(NodeDescriptor::new(
                node.id().0,
                node.name(),
                node.descriptor(),
                node.value_expected_shape().to_vec(),
                parents,
            ));
        }

        descriptor
    }

    // ========== 模型摘要（summary）==========

    /// 打印模型摘要（类似 Keras 的 `model.summary()`）
    pub fn summary(&self) {
        println!("{}", self.summary_string());
    }

    /// 将模型摘要保存到文件
    ///
    /// 根据文件扩展名自动选择格式：
    /// - `.md` → Markdown 表格
    /// - 其他（`.txt` 等）→ Unicode 文本表格
    pub fn save_summary<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        let summary = match path.extension().and_then(|e| e.to_str()) {
            Some("md") => self.summary_markdown(),
            _ => self.summary_string(),
        };
        std::fs::write(path, summary)
            .map_err(|e| GraphError::Io(format!("保存摘要文件失败: {e}")))
    }

    /// 返回模型摘要的 Markdown 格式字符串
    pub fn summary_markdown(&self) -> String {
        let desc = self.describe();
        let mut output = String::new();

        output.push_str(&format!("# 模型摘要: {}\n\n", desc.name));
        output.push_str("| 节点名称 | 类型 | 输出形状 | 参数量 | 父节点 |\n");
        output.push_str("|----------|------|----------|--------|--------|\n");

        for node in &desc.nodes {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                node.name,
                node.node_type.type_name(),
                Self::format_shape(node),
                Self::format_param_count(node),
                Self::format_parent_names(&desc, &node.parents)
            ));
        }

        let total = desc.total_params();
        let trainable = desc.trainable_params();
        output.push_str(&format!(
            "\n**总参数量**: {}  \n**可训练参数**: {}  \n**不可训练参数**: {}\n",
            Self::format_number(total),
            Self::format_number(trainable),
            Self::format_number(total - trainable)
        ));

        output
    }

    /// 返回模型摘要字符串（Unicode 文本表格，用于控制台输出）
    pub fn summary_string(&self) -> String {
        let desc = self.describe();
        let rows: Vec<[String; 5]> = desc
            .nodes
            .iter()
            .map(|node| {
                [
                    node.name.clone(),
                    node.node_type.type_name().to_string(),
                    Self::format_shape(node),
                    Self::format_param_count(node),
                    Self::format_parent_names(&desc, &node.parents),
                ]
            })
            .collect();

        let headers = ["节点名称", "类型", "输出形状", "参数量", "父节点"];
        let mut widths = [8, 8, 8, 10, 6];
        for (i, width) in widths.iter_mut().enumerate() {
            *width = rows
                .iter()
                .map(|row| Self::display_width(&row[i]))
                .chain(std::iter::once(Self::display_width(headers[i])))
                .max()
                .unwrap_or(0)
                .max(*width);
        }
        // 边框和间距
        let total_width = widths.iter().sum::<usize>() + 16;

        let line = |left: &str, mid: &str, right: &str| {
            let segments: Vec<_> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", segments.join(mid))
        };
        let row_line = |cells: &[&str], right_align_params: bool| {
            let mut s = String::from("│");
            for (i, cell) in cells.iter().enumerate() {
                let pad = " ".repeat(widths[i].saturating_sub(Self::display_width(cell)));
                if i == 3 && right_align_params {
                    s.push_str(&format!(" {pad}{cell} │"));
                } else {
                    s.push_str(&format!(" {cell}{pad} │"));
                }
            }
            s.push('\n');
            s
        };

        let mut output = format!("模型: {}\n", desc.name);
        output.push_str(&line("┌", "┬", "┐"));
        output.push_str(&row_line(&headers, false));
        output.push_str(&line("├", "┼", "┤"));
        for row in &rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            output.push_str(&row_line(&cells, true));
        }
        output.push_str(&line("├", "┴", "┤"));

        let total = desc.total_params();
        let trainable = desc.trainable_params();
        for text in [
            format!("总参数量: {}", Self::format_number(total)),
            format!("可训练参数: {}", Self::format_number(trainable)),
            format!("不可训练参数: {}", Self::format_number(total - trainable)),
        ] {
            let pad = " ".repeat((total_width - 4).saturating_sub(Self::display_width(&text)));
            output.push_str(&format!("│ {text}{pad} │\n"));
        }
        output.push_str(&format!("└{}┘\n", "─".repeat(total_width - 2)));

        output
    }

    /// 格式化数字为千分位分隔形式
    pub(crate) fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }

    /// 参数节点显示完整形状，其余节点显示带 batch 占位的形状
    fn format_shape(node: &NodeDescriptor) -> String {
        match node.node_type {
            NodeTypeDescriptor::Parameter { .. } => format!("{:?}", node.output_shape),
            _ => format_batched_shape(&node.output_shape),
        }
    }

    fn format_param_count(node: &NodeDescriptor) -> String {
        node.param_count
            .map_or_else(|| "-".to_string(), Self::format_number)
    }

    /// 格式化父节点名称列表
    fn format_parent_names(desc: &GraphDescriptor, parent_ids: &[u64]) -> String {
        if parent_ids.is_empty() {
            "-".to_string()
        } else {
            parent_ids
                .iter()
                .filter_map(|id| desc.nodes.iter().find(|n| n.id == *id))
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// 计算字符串显示宽度（考虑中文字符）
    fn display_width(s: &str) -> usize {
        s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
    }
}
