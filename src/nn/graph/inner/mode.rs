/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : GraphInner train/eval 模式
 */

use super::GraphInner;

impl GraphInner {
    pub const fn set_train_mode(&mut self) {
        self.is_eval_mode = false;
    }

    pub const fn set_eval_mode(&mut self) {
        self.is_eval_mode = true;
    }

    pub const fn is_train_mode(&self) -> bool {
        !self.is_eval_mode
    }

    /// 在指定模式下执行`f`，结束后（无论成败）恢复原模式
    pub fn mode_scope<F, R>(&mut self, is_train: bool, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let was_eval = self.is_eval_mode;
        self.is_eval_mode = !is_train;
        let result = f(self);
        self.is_eval_mode = was_eval;
        result
    }
}
