/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : GraphInner 高层模型 I/O（save_model/load_model）
 *
 * 职责：完整模型的保存/加载（拓扑 JSON + 参数 bin）
 * 依赖：describe() + save_params()/load_params()
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::descriptor::GraphDescriptor;
use std::path::Path;

impl GraphInner {
    /// 保存完整模型（拓扑 JSON + 参数 bin）
    ///
    /// 自动生成两个文件：
    /// - `{path}.json`: 图的拓扑描述（可读）
    /// - `{path}.bin`: 参数数据（紧凑）
    ///
    /// # 示例
    /// ```ignore
    /// graph.save_model("models/resnet")?;
    /// // 生成：models/resnet.json + models/resnet.bin
    /// ```
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        let json_path = path.with_extension("json");
        let bin_path = path.with_extension("bin");

        self.save_params(&bin_path)?;

        let mut descriptor = self.describe();
        descriptor.params_file = Some(bin_path.file_name().map_or_else(
            || "params.bin".to_string(),
            |s| s.to_string_lossy().to_string(),
        ));

        let json = descriptor
            .to_json()
            .map_err(|e| GraphError::Io(format!("序列化图描述失败: {e}")))?;
        std::fs::write(&json_path, json)
            .map_err(|e| GraphError::Io(format!("写入 JSON 文件失败: {e}")))?;

        tracing::info!("模型已保存: {}", json_path.display());
        Ok(())
    }

    /// 加载模型参数（需要先用代码构建相同结构的图）
    ///
    /// 加载前会比对 JSON 中的拓扑（节点名、类型、形状）与当前图是否一致，
    /// 不一致时返回错误且不修改任何参数。
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        let json_path = path.with_extension("json");

        let json = std::fs::read_to_string(&json_path)
            .map_err(|e| GraphError::Io(format!("读取 JSON 文件失败: {e}")))?;
        let saved = GraphDescriptor::from_json(&json)
            .map_err(|e| GraphError::Io(format!("解析图描述失败: {e}")))?;

        self.check_same_topology(&saved)?;

        let bin_path = if let Some(ref params_file) = saved.params_file {
            path.parent().map_or_else(
                || Path::new(params_file).to_path_buf(),
                |p| p.join(params_file),
            )
        } else {
            path.with_extension("bin")
        };

        self.load_params(&bin_path)
    }

    fn check_same_topology(&self, saved: &GraphDescriptor) -> Result<(), GraphError> {
        let current = self.describe();
        if current.nodes.len() != saved.nodes.len() {
            return Err(GraphError::InvalidOperation(format!(
                "模型结构不一致：当前图有{}个节点，文件中有{}个",
                current.nodes.len(),
                saved.nodes.len()
            )));
        }
        for (cur, old) in current.nodes.iter().zip(&saved.nodes) {
            if cur.name != old.name
                || cur.node_type.type_name() != old.node_type.type_name()
                || cur.output_shape != old.output_shape
            {
                return Err(GraphError::InvalidOperation(format!(
                    "模型结构不一致：节点{}({} {:?})与文件中的{}({} {:?})不符",
                    cur.name,
                    cur.node_type.type_name(),
                    cur.output_shape,
                    old.name,
                    old.node_type.type_name(),
                    old.output_shape
                )));
            }
        }
        Ok(())
    }
}
