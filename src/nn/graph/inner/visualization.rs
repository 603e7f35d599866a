/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : GraphInner Graphviz DOT 可视化
 */

use super::super::error::{GraphError, ImageFormat, VisualizationOutput};
use super::super::types::GroupKind;
use super::GraphInner;
use crate::nn::descriptor::{NodeDescriptor, NodeTypeDescriptor};
use crate::nn::format_batched_shape;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::Command;

impl GraphInner {
    // ========== Graphviz DOT 可视化 ==========

    /// 生成 Graphviz DOT 格式的图描述字符串
    ///
    /// 分组（层、残差单元、stage）按包含关系嵌套为 cluster，
    /// 每个节点只出现在包含它的最内层分组中。
    ///
    /// # 节点样式
    /// - **Input**: 椭圆形，浅蓝色
    /// - **Parameter**: 矩形，浅绿色（不可训练的为虚线）
    /// - **Activation**: 菱形，浅橙色
    /// - **其他运算节点**: 圆角矩形，浅黄色
    pub fn to_dot(&self) -> String {
        let desc = self.describe();
        let mut dot = String::new();

        dot.push_str("digraph Model {\n");
        dot.push_str("    rankdir=TB;\n");
        dot.push_str("    newrank=true;\n");
        dot.push_str("    splines=polyline;\n");
        dot.push_str("    node [fontname=\"Microsoft YaHei,SimHei,Arial\"];\n");
        dot.push_str("    edge [fontname=\"Microsoft YaHei,SimHei,Arial\"];\n");
        dot.push('\n');

        // 分组按 (节点数, 注册顺序) 由内到外排序
        let sets: Vec<HashSet<u64>> = self
            .layer_groups
            .iter()
            .map(|g| g.node_ids.iter().map(|id| id.0).collect())
            .collect();
        let key = |i: usize| (sets[i].len(), i);
        let mut order: Vec<usize> = (0..sets.len()).collect();
        order.sort_by_key(|&i| key(i));

        // 每个分组的父分组：包含它的分组中最内层的一个
        let mut children: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
        for &i in &order {
            let parent = order
                .iter()
                .copied()
                .filter(|&j| key(j) > key(i) && sets[i].is_subset(&sets[j]))
                .min_by_key(|&j| key(j));
            children.entry(parent).or_default().push(i);
        }

        // 每个节点归属于包含它的最内层分组
        let mut home: HashMap<Option<usize>, Vec<&NodeDescriptor>> = HashMap::new();
        for node in &desc.nodes {
            let group = order.iter().copied().find(|&i| sets[i].contains(&node.id));
            home.entry(group).or_default().push(node);
        }

        self.write_cluster(&mut dot, None, &children, &home, 1);

        dot.push('\n');
        for node in &desc.nodes {
            for parent in &node.parents {
                dot.push_str(&format!("    \"{}\" -> \"{}\";\n", parent, node.id));
            }
        }
        dot.push_str("}\n");
        dot
    }

    /// 递归输出分组（None 表示顶层）
    fn write_cluster(
        &self,
        dot: &mut String,
        group: Option<usize>,
        children: &HashMap<Option<usize>, Vec<usize>>,
        home: &HashMap<Option<usize>, Vec<&NodeDescriptor>>,
        depth: usize,
    ) {
        let indent = "    ".repeat(depth);
        if let Some(i) = group {
            let g = &self.layer_groups[i];
            dot.push_str(&format!(
                "{indent}subgraph cluster_{} {{\n",
                g.name.replace(['-', '.', ' '], "_")
            ));
            dot.push_str(&format!(
                "{indent}    label=<<B>{}</B><BR/><FONT POINT-SIZE=\"9\">{}: {}</FONT>>;\n",
                g.name, g.layer_type, g.description
            ));
            match g.kind {
                GroupKind::Block => dot.push_str(&format!("{indent}    style=\"filled,bold\";\n")),
                GroupKind::Layer => dot.push_str(&format!("{indent}    style=filled;\n")),
            }
            dot.push_str(&format!(
                "{indent}    fillcolor=\"{}\";\n",
                Self::group_color(g.kind, i)
            ));
            dot.push_str(&format!("{indent}    fontsize=10;\n"));
            dot.push_str(&format!("{indent}    margin=8;\n"));
        }

        let inner_indent = if group.is_some() {
            format!("{indent}    ")
        } else {
            indent.clone()
        };
        for node in home.get(&group).into_iter().flatten() {
            dot.push_str(&inner_indent);
            dot.push_str(&Self::dot_node_def(node));
        }
        for &child in children.get(&group).into_iter().flatten() {
            let child_depth = if group.is_some() { depth + 1 } else { depth };
            self.write_cluster(dot, Some(child), children, home, child_depth);
        }

        if group.is_some() {
            dot.push_str(&format!("{indent}}}\n"));
        }
    }

    fn dot_node_def(node: &NodeDescriptor) -> String {
        let (shape, style, fillcolor) = Self::dot_node_style(&node.node_type);
        format!(
            "\"{}\" [label=<{}> shape={} style={} fillcolor=\"{}\" fontsize=10];\n",
            node.id,
            Self::dot_node_label_html(node),
            shape,
            style,
            fillcolor
        )
    }

    /// 获取节点的 DOT 样式 (shape, style, fillcolor)
    const fn dot_node_style(
        node_type: &NodeTypeDescriptor,
    ) -> (&'static str, &'static str, &'static str) {
        match node_type {
            NodeTypeDescriptor::Input => ("ellipse", "filled", "#E3F2FD"),
            NodeTypeDescriptor::Parameter { trainable: true } => ("box", "filled", "#E8F5E9"),
            NodeTypeDescriptor::Parameter { trainable: false } => {
                ("box", "\"filled,dashed\"", "#E8F5E9")
            }
            NodeTypeDescriptor::Activation { .. } => ("diamond", "filled", "#FFF3E0"),
            _ => ("box", "\"filled,rounded\"", "#FFFDE7"),
        }
    }

    /// 节点标签：名称、类型、形状、参数量及类型特有信息
    fn dot_node_label_html(node: &NodeDescriptor) -> String {
        let shape_str = match node.node_type {
            NodeTypeDescriptor::Parameter { .. } => format!("{:?}", node.output_shape),
            _ => format_batched_shape(&node.output_shape),
        };

        let mut parts = vec![
            node.name.clone(),
            format!("<B>{}</B>", node.node_type.type_name()),
            shape_str,
        ];
        if let Some(params) = node.param_count {
            parts.push(format!("({} params)", Self::format_number(params)));
        }
        let extra_info = match &node.node_type {
            NodeTypeDescriptor::Conv2d {
                kernel_size,
                stride,
                padding,
            } => Some(format!(
                "k={}×{} s={}×{} {padding:?}",
                kernel_size.0, kernel_size.1, stride.0, stride.1
            )),
            NodeTypeDescriptor::Activation { kind } => Some(kind.to_string()),
            NodeTypeDescriptor::AvgPool2d { pool_size, .. } => {
                Some(format!("{}×{}", pool_size.0, pool_size.1))
            }
            NodeTypeDescriptor::Dropout { rate } => Some(format!("p={rate}")),
            _ => None,
        };
        parts.extend(extra_info);
        parts.join("<BR/>")
    }

    /// 分组背景颜色（半透明）
    fn group_color(kind: GroupKind, index: usize) -> &'static str {
        const LAYER_COLORS: &[&str] = &[
            "#E3F2FD80", // 浅蓝
            "#E8F5E980", // 浅绿
            "#FFF3E080", // 浅橙
            "#F3E5F580", // 浅紫
            "#E0F7FA80", // 浅青
            "#FCE4EC80", // 浅粉
        ];
        const BLOCK_COLORS: &[&str] = &[
            "#FFECB340", // 浅琥珀
            "#D1C4E940", // 浅深紫
            "#B2DFDB40", // 浅青绿
            "#DCEDC840", // 浅黄绿
        ];
        match kind {
            GroupKind::Layer => LAYER_COLORS[index % LAYER_COLORS.len()],
            GroupKind::Block => BLOCK_COLORS[index % BLOCK_COLORS.len()],
        }
    }

    /// 保存计算图可视化
    ///
    /// # 参数
    /// - `base_path`: 基础路径（**不含后缀**），如 `"outputs/model"`
    /// - `format`: 可选的图像格式，默认为 PNG
    ///
    /// # 行为
    /// - 始终生成 `{base_path}.dot`
    /// - 若 Graphviz 可用，额外生成 `{base_path}.{format}`
    /// - 若 Graphviz 不可用，返回结果中包含安装提示
    pub fn save_visualization<P: AsRef<Path>>(
        &self,
        base_path: P,
        format: Option<ImageFormat>,
    ) -> Result<VisualizationOutput, GraphError> {
        let path = base_path.as_ref();

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy();
            return Err(GraphError::InvalidOperation(format!(
                "请提供不含后缀的基础路径（得到'.{ext_str}'），例如 \"outputs/model\"；\
                 库会自动生成 .dot 和图像文件"
            )));
        }

        let dot_path = path.with_extension("dot");
        std::fs::write(&dot_path, self.to_dot())
            .map_err(|e| GraphError::Io(format!("保存 DOT 文件失败: {e}")))?;

        let format = format.unwrap_or_default();
        let image_path = path.with_extension(format.extension());
        let (graphviz_available, graphviz_hint, final_image_path) =
            match Self::render_with_graphviz(&dot_path, &image_path, format) {
                Ok(()) => (true, None, Some(image_path)),
                Err(hint) => (false, Some(hint), None),
            };
        if let Some(hint) = &graphviz_hint {
            tracing::warn!("{hint}");
        }

        Ok(VisualizationOutput {
            dot_path,
            image_path: final_image_path,
            graphviz_available,
            graphviz_hint,
        })
    }

    /// 检测 Graphviz 是否可用
    fn is_graphviz_available() -> bool {
        Command::new("dot")
            .arg("-V")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// 使用 Graphviz 渲染 DOT 文件为图像
    fn render_with_graphviz(
        dot_path: &Path,
        output_path: &Path,
        format: ImageFormat,
    ) -> Result<(), String> {
        if !Self::is_graphviz_available() {
            return Err("Graphviz 未安装或不在 PATH 中。\n\
                 安装方式:\n\
                 - macOS: brew install graphviz\n\
                 - Linux: sudo apt install graphviz\n\
                 安装后可用在线预览: https://dreampuf.github.io/GraphvizOnline/"
                .to_string());
        }

        let output = Command::new("dot")
            .arg(format!("-T{}", format.extension()))
            .arg(dot_path)
            .arg("-o")
            .arg(output_path)
            .output();

        match output {
            Ok(result) if result.status.success() => Ok(()),
            Ok(result) => {
                let stderr = String::from_utf8_lossy(&result.stderr);
                Err(format!("Graphviz 渲染失败: {stderr}"))
            }
            Err(e) => Err(format!("执行 Graphviz 命令失败: {e}")),
        }
    }
}
