/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 子节点命名
 */

/// 由可选标签派生子节点名：`Some("Inpt"), "conv"` → `Some("Inpt_conv")`
///
/// 无标签时返回 None，交由图自动命名（如 `conv2d_3`）。
/// 纯函数：同样的输入总得到同样的名字，与调用顺序无关。
pub fn sub_name(label: Option<&str>, suffix: &str) -> Option<String> {
    label.map(|l| format!("{l}_{suffix}"))
}
