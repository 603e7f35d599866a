/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 设备上下文：进程级别的一次性初始化（CPU线程池、默认随机种子）
 *
 * 须在任何建模调用之前显式调用`DeviceContext::init`；
 * 建模工厂函数以`&DeviceContext`为参数，初始化顺序由类型系统保证。
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

static DEVICE: OnceLock<DeviceContext> = OnceLock::new();

/// 设备上下文初始化错误
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("设备上下文已用不同配置初始化：已有{existing:?}，请求{requested:?}")]
    AlreadyInitialized {
        existing: DeviceConfig,
        requested: DeviceConfig,
    },
    #[error("线程数须>0")]
    ZeroThreads,
    #[error("读取设备配置失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("解析设备配置失败: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 设备配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// 前向计算线程数，None 表示由 rayon 按 CPU 核数决定
    pub num_threads: Option<usize>,
    /// 建模时使用的默认随机种子，None 表示参数初始化不可复现
    pub seed: Option<u64>,
}

impl DeviceConfig {
    /// 从 JSON 文件读取配置，缺省字段取默认值
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, DeviceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 进程级设备上下文（只读，初始化后不再变化）
#[derive(Debug)]
pub struct DeviceContext {
    config: DeviceConfig,
}

impl DeviceContext {
    /// 初始化设备上下文（每个进程一次）
    ///
    /// - 首次调用：配置 rayon 全局线程池并返回上下文
    /// - 再次调用且配置相同：直接返回已有上下文
    /// - 再次调用且配置不同：返回`DeviceError::AlreadyInitialized`
    pub fn init(config: DeviceConfig) -> Result<&'static Self, DeviceError> {
        if let Some(existing) = DEVICE.get() {
            return existing.check_same(config);
        }
        if config.num_threads == Some(0) {
            return Err(DeviceError::ZeroThreads);
        }

        let mut init_result = Ok(());
        let ctx = DEVICE.get_or_init(|| {
            if let Some(n) = config.num_threads {
                // 全局线程池只能构建一次；若宿主程序已构建过，则沿用之
                if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
                    init_result = Err(e.to_string());
                }
            }
            tracing::info!(
                "设备上下文初始化完成：threads={:?}, seed={:?}",
                config.num_threads,
                config.seed
            );
            Self {
                config: config.clone(),
            }
        });

        match init_result {
            Ok(()) => ctx.check_same(config),
            Err(msg) => {
                tracing::warn!("rayon 全局线程池已存在，沿用现有线程池: {msg}");
                Ok(ctx)
            }
        }
    }

    /// 获取已初始化的上下文
    pub fn get() -> Option<&'static Self> {
        DEVICE.get()
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    /// 实际使用的计算线程数
    pub fn num_threads(&self) -> usize {
        rayon::current_num_threads()
    }

    fn check_same(&'static self, requested: DeviceConfig) -> Result<&'static Self, DeviceError> {
        if self.config == requested {
            Ok(self)
        } else {
            Err(DeviceError::AlreadyInitialized {
                existing: self.config.clone(),
                requested,
            })
        }
    }
}
