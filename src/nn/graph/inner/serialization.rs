/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : GraphInner 底层参数序列化（save_params/load_params）
 *
 * 职责：纯二进制序列化，只处理参数的读写（含 BatchNorm 的滑动统计量）
 *
 * 与 model_io.rs 的区别：
 * - serialization.rs：底层二进制序列化（bincode）
 * - model_io.rs：高层模型 I/O（生成/解析 GraphDescriptor + 调用底层序列化）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// 参数文件魔数
const PARAMS_MAGIC: [u8; 4] = *b"RGPR";
/// 参数文件版本
const PARAMS_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ParamsFile {
    magic: [u8; 4],
    version: u32,
    params: Vec<ParamRecord>,
}

#[derive(Serialize, Deserialize)]
struct ParamRecord {
    name: String,
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl GraphInner {
    /// 保存所有参数（按节点 ID 升序）到二进制文件
    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let params = self
            .get_parameter_nodes()
            .into_iter()
            .map(|id| {
                let node = self.get_node(id)?;
                let value = node.value().ok_or_else(|| {
                    GraphError::InvalidOperation(format!("参数 {} 没有值", node.name()))
                })?;
                Ok(ParamRecord {
                    name: node.name().to_string(),
                    shape: value.shape().to_vec(),
                    data: value.data_as_slice().to_vec(),
                })
            })
            .collect::<Result<Vec<_>, GraphError>>()?;
        let count = params.len();

        let file = File::create(path.as_ref())
            .map_err(|e| GraphError::Io(format!("无法创建参数文件: {e}")))?;
        let mut writer = BufWriter::new(file);
        let params_file = ParamsFile {
            magic: PARAMS_MAGIC,
            version: PARAMS_VERSION,
            params,
        };
        bincode::serialize_into(&mut writer, &params_file)
            .map_err(|e| GraphError::Io(format!("写入参数失败: {e}")))?;
        writer
            .flush()
            .map_err(|e| GraphError::Io(format!("刷新缓冲区失败: {e}")))?;

        tracing::debug!("已保存{count}个参数到{}", path.as_ref().display());
        Ok(())
    }

    /// 从二进制文件加载参数
    ///
    /// 先校验全部记录（名称对应的节点存在时形状必须一致），再统一写入；
    /// 任一记录不合法则图保持不变。文件中多余的参数会被忽略。
    pub fn load_params<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GraphError> {
        let file = File::open(path.as_ref())
            .map_err(|e| GraphError::Io(format!("无法打开参数文件: {e}")))?;
        let params_file: ParamsFile = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| GraphError::Io(format!("无效的参数文件: {e}")))?;

        if params_file.magic != PARAMS_MAGIC {
            return Err(GraphError::Io(
                "无效的参数文件：请确保使用 save_params() 保存的文件".to_string(),
            ));
        }
        if params_file.version != PARAMS_VERSION {
            return Err(GraphError::Io(format!(
                "不支持的参数文件版本: {}",
                params_file.version
            )));
        }

        let name_to_id: HashMap<String, NodeId> = self
            .get_parameter_nodes()
            .into_iter()
            .filter_map(|id| Some((self.nodes.get(&id)?.name().to_string(), id)))
            .collect();

        let mut staged = Vec::with_capacity(params_file.params.len());
        for record in params_file.params {
            let Some(&node_id) = name_to_id.get(&record.name) else {
                tracing::warn!("参数文件中的{}在图中不存在，已忽略", record.name);
                continue;
            };
            let expected = self.get_node_value_expected_shape(node_id)?;
            if record.shape != expected {
                return Err(GraphError::ShapeMismatch {
                    expected: expected.to_vec(),
                    got: record.shape,
                    message: format!("参数{}的形状与图中不一致", record.name),
                });
            }
            let tensor = Tensor::try_new(&record.data, &record.shape)
                .map_err(|e| GraphError::Io(format!("参数{}数据损坏: {e}", record.name)))?;
            staged.push((node_id, tensor));
        }

        for (node_id, tensor) in staged {
            self.set_node_value(node_id, Some(&tensor))?;
        }
        Ok(())
    }
}
