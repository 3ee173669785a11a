//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// タグ・画像・バリアント操作のエラー
///
/// `Capacity`/`Duplicate`/`InvalidType` はユーザー操作の拒否で、通知として表示する。
/// `OutOfRange`/`NotFound` は呼び出し側（UI層）の誤用を示す。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("上限に達しています（最大{max}件）")]
    Capacity { max: usize },

    #[error("既に登録されています: {0}")]
    Duplicate(String),

    #[error("画像ファイルではありません: {0}")]
    InvalidType(String),

    #[error("インデックスが範囲外です: {index} (件数: {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("見つかりません: {0}")]
    NotFound(String),
}

impl CollectionError {
    /// 呼び出し側の誤用（UIから古いインデックス/IDが渡された等）かどうか
    pub fn is_misuse(&self) -> bool {
        matches!(self, CollectionError::OutOfRange { .. } | CollectionError::NotFound(_))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
