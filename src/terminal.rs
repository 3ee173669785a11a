//! 端末での通知と確認

use dialoguer::Confirm;
use indicatif::ProgressBar;
use product_wizard_common::{ConfirmDialog, Notifier, Severity};

/// 通知を端末に出す
///
/// 進捗バーの表示中はバーの上に出力する。
#[derive(Clone, Default)]
pub struct TerminalNotifier {
    progress: Option<ProgressBar>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn format(message: &str, severity: Severity) -> String {
        let mark = match severity {
            Severity::Info => "ℹ",
            Severity::Success => "✔",
            Severity::Warning => "⚠",
            Severity::Error => "✖",
        };
        format!("{} {}", mark, message)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        let line = Self::format(message, severity);
        match (&self.progress, severity) {
            (Some(pb), _) => pb.println(line),
            (None, Severity::Warning | Severity::Error) => eprintln!("{}", line),
            (None, _) => println!("{}", line),
        }
    }
}

/// dialoguer の確認プロンプト
///
/// 入力できない環境（パイプ等）では「いいえ」とみなす。
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl ConfirmDialog for TerminalConfirm {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        println!("{}", title);
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// 決まった答えを返す（`--yes` 指定時）
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmDialog for FixedAnswer {
    fn confirm(&mut self, _title: &str, _message: &str) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(
            TerminalNotifier::format("保存しました", Severity::Success),
            "✔ 保存しました"
        );
        assert_eq!(TerminalNotifier::format("x", Severity::Error), "✖ x");
    }

    #[test]
    fn test_fixed_answer() {
        assert!(FixedAnswer(true).confirm("t", "m"));
        assert!(!FixedAnswer(false).confirm("t", "m"));
    }
}
