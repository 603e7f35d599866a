/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : ResNet v1 残差块：若干残差单元串联
 *
 * 第 k 个单元（从 0 计）：
 *   y = res_layer(x, filters, s)          s = 2 仅当 downsample 且 k == 0
 *   y = res_layer(y, filters, 1, 无激活)
 *   x = 投影(x) 或 x                        投影 = 1×1 卷积、步长 s、无 bn、无激活
 *   x = relu(x + y)
 *
 * 只有第 0 个单元可能改变分辨率或通道数。
 */

use super::res_layer::{LayerConfig, res_layer};
use crate::nn::{Activation, GraphError, Var, VarActivationOps, VarMergeOps};

/// 构建残差块
///
/// 第 0 个单元在下采样或输入通道数不等于 `filters` 时使用投影跳连，其余单元均为恒等跳连。
/// 节点名：`{prefix}_Blk{k+1}_Res1`、`_Res2`、`_lin`、`_add`、`_relu`。
pub fn res_block_v1(
    x: &Var,
    filters: usize,
    units: usize,
    downsample: bool,
    prefix: &str,
) -> Result<Var, GraphError> {
    GraphError::check_at_least("units", units, 1)?;
    GraphError::check_at_least("filters", filters, 1)?;
    let graph = x.get_graph();
    let input_shape = x.shape()?;

    let output = graph.atomic(|| {
        let block_since = graph.checkpoint();
        let mut x = x.clone();

        for k in 0..units {
            let unit_since = graph.checkpoint();
            let unit = format!("{prefix}_Blk{}", k + 1);
            let strides = if downsample && k == 0 { 2 } else { 1 };

            let y = res_layer(
                &x,
                &LayerConfig::new(filters)
                    .strides(strides)
                    .name(format!("{unit}_Res1")),
            )?;
            let y = res_layer(
                &y,
                &LayerConfig::new(filters)
                    .activation(None)
                    .name(format!("{unit}_Res2")),
            )?;

            let in_channels = x.shape()?[0];
            let projected = k == 0 && (downsample || in_channels != filters);
            if projected {
                x = res_layer(
                    &x,
                    &LayerConfig::new(filters)
                        .kernel_size(1)
                        .strides(strides)
                        .activation(None)
                        .batch_normalization(false)
                        .name(format!("{unit}_lin")),
                )?;
            }

            x = x.add_merge(&y, Some(&format!("{unit}_add")))?;
            x = x.activation(Activation::Relu, Some(&format!("{unit}_relu")))?;

            graph.register_block_group(
                &unit,
                "ResUnit",
                if projected { "投影跳连" } else { "恒等跳连" },
                unit_since,
            );
        }

        graph.register_block_group(
            prefix,
            "ResBlock",
            &format!("{units}×{filters}{}", if downsample { ", ↓2" } else { "" }),
            block_since,
        );
        Ok(x)
    })?;

    tracing::debug!(
        "残差块{prefix}: {:?} → {:?}（{units}个单元）",
        input_shape,
        output.shape()?
    );
    Ok(output)
}
