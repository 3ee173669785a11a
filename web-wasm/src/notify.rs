//! 通知と確認ダイアログ（ブラウザ）

use js_sys::Function;
use product_wizard_common::{ConfirmDialog, Notifier, Severity};
use wasm_bindgen::JsValue;
use web_sys::console;

/// JSのコールバック `(message, severity) => void` に通知を渡す
///
/// コールバックがなければコンソールに出す。
#[derive(Debug, Clone, Default)]
pub struct JsNotifier {
    callback: Option<Function>,
}

impl JsNotifier {
    pub fn new(callback: Option<Function>) -> Self {
        Self { callback }
    }
}

impl Notifier for JsNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        if let Some(callback) = &self.callback {
            let result = callback.call2(
                &JsValue::NULL,
                &JsValue::from_str(message),
                &JsValue::from_str(severity.as_str()),
            );
            if result.is_ok() {
                return;
            }
        }
        let text = JsValue::from_str(message);
        match severity {
            Severity::Error => console::error_1(&text),
            Severity::Warning => console::warn_1(&text),
            _ => console::log_1(&text),
        }
    }
}

/// `window.confirm` による確認
#[derive(Debug, Default)]
pub struct BrowserConfirm;

impl ConfirmDialog for BrowserConfirm {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        gloo::dialogs::confirm(&format!("{}\n\n{}", title, message))
    }
}
