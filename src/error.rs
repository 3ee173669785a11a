use product_wizard_common::{SubmissionError, ValidationResult};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("下書きがありません: {0}")]
    NoDraft(String),

    #[error("セッションにアクセスできません（自動保存中の異常終了）")]
    SessionLock,

    #[error("入力エラー: {}", format_errors(.0))]
    Invalid(ValidationResult),

    #[error("{0}")]
    Submission(#[from] SubmissionError),

    #[error("{0}")]
    Form(#[from] product_wizard_common::Error),

    #[error("入力操作エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

fn format_errors(result: &ValidationResult) -> String {
    result
        .errors()
        .values()
        .cloned()
        .collect::<Vec<_>>()
        .join(" / ")
}

pub type Result<T> = std::result::Result<T, WizardError>;
