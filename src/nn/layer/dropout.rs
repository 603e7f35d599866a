/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Dropout 层（训练模式下按比例随机置零并放大，推理模式下恒等）
 */

use crate::nn::{GraphError, Module, Var, VarPoolOps};

#[derive(Debug)]
pub struct Dropout {
    rate: f32,
    name: Option<String>,
}

impl Dropout {
    pub fn new(rate: f32, name: Option<&str>) -> Result<Self, GraphError> {
        if !(0.0..1.0).contains(&rate) {
            return Err(GraphError::InvalidConfig(format!(
                "Dropout 比例须在 [0, 1) 内，得到 {rate}"
            )));
        }
        Ok(Self {
            rate,
            name: name.map(str::to_string),
        })
    }

    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.dropout(self.rate, self.name.as_deref())
    }
}

impl Module for Dropout {
    fn parameters(&self) -> Vec<Var> {
        Vec::new()
    }
}
