//! ステップ遷移の制御
//!
//! 進む操作は現在のステップが検証を通った場合のみ。戻る操作は検証しない。

use crate::state::FormState;
use crate::validation::{validate_step, Step, ValidationResult};
use serde::Serialize;
use std::collections::BTreeSet;

/// ナビゲーションボタンの表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonVisibility {
    pub previous: bool,
    pub next: bool,
    pub submit: bool,
}

/// `advance` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(Step),
    /// 検証エラーで進めなかった（状態は変化しない）
    Blocked(ValidationResult),
    /// 最終ステップ（これ以上進めない）
    AtEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardController {
    current: Step,
    completed: BTreeSet<Step>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self::starting_at(Step::BasicInfo)
    }

    /// 下書き復元用
    pub fn starting_at(step: Step) -> Self {
        Self {
            current: step,
            completed: BTreeSet::new(),
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed.contains(&step)
    }

    pub fn advance(&mut self, state: &FormState) -> Advance {
        if self.current == Step::Preview {
            return Advance::AtEnd;
        }
        let result = validate_step(self.current, state);
        if !result.is_valid() {
            return Advance::Blocked(result);
        }
        self.completed.insert(self.current);
        self.current = self.current.next();
        Advance::Moved(self.current)
    }

    /// 1つ前のステップへ（最初のステップでは何もしない）
    pub fn retreat(&mut self) -> bool {
        let prev = self.current.prev();
        let moved = prev != self.current;
        self.current = prev;
        moved
    }

    /// 送信時の検証失敗でステップへ戻す
    pub fn jump_to(&mut self, step: Step) {
        self.current = step;
    }

    /// 進捗率（%）
    pub fn progress_percent(&self) -> f32 {
        f32::from(self.current.number()) * 100.0 / f32::from(Step::TOTAL)
    }

    pub fn buttons(&self) -> ButtonVisibility {
        let last = self.current == Step::Preview;
        ButtonVisibility {
            previous: self.current != Step::BasicInfo,
            next: !last,
            submit: last,
        }
    }
}
