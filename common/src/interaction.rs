//! UI層との境界（通知・確認ダイアログ・送信・画面遷移）

use crate::error::Result;
use crate::submission::SubmissionPayload;
use serde::Serialize;

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// 一時的な通知の表示
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// はい/いいえの確認
///
/// 1回の呼び出しで1つの結果を返す。
pub trait ConfirmDialog {
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

/// 送信処理（プロトコルは実装側の関心事）
pub trait SubmissionTransport {
    fn send(&mut self, payload: &SubmissionPayload) -> Result<()>;
}

/// セッション終了後の遷移先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationIntent {
    ProductList,
}

impl NavigationIntent {
    pub fn target(&self) -> &'static str {
        match self {
            NavigationIntent::ProductList => "products-list",
        }
    }
}

/// 通知を捨てる
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}
