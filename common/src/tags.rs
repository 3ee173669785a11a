//! タグコレクション
//!
//! 商品タグとバリアント値の両方で使う、順序付き・重複なし・上限付きの文字列集合。

use crate::error::CollectionError;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCollection {
    items: Vec<String>,
    /// `None` は上限なし
    max: Option<usize>,
}

impl TagCollection {
    /// 上限付きのコレクション（商品タグ用）
    pub fn bounded(max: usize) -> Self {
        Self {
            items: Vec::new(),
            max: Some(max),
        }
    }

    /// 上限なしのコレクション（バリアント値用）
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// 値を追加
    ///
    /// 前後の空白を除去し、空文字なら何もせず `Ok(false)` を返す。
    /// 上限到達・重複の場合はエラーで、コレクションは変化しない。
    pub fn add(&mut self, value: &str) -> Result<bool, CollectionError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        if let Some(max) = self.max {
            if self.items.len() >= max {
                return Err(CollectionError::Capacity { max });
            }
        }
        if self.contains(value) {
            return Err(CollectionError::Duplicate(value.to_string()));
        }
        self.items.push(value.to_string());
        Ok(true)
    }

    /// 指定位置の値を削除して返す
    pub fn remove(&mut self, index: usize) -> Result<String, CollectionError> {
        if index >= self.items.len() {
            return Err(CollectionError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// 保存用の文字列リスト
    pub fn serialize(&self) -> Vec<String> {
        self.items.clone()
    }

    /// 保存済みリストから復元
    ///
    /// 不変条件を満たさない入力（空文字・重複・上限超過）は、
    /// 最初に現れた値を残して切り詰める。
    pub fn deserialize(values: Vec<String>, max: Option<usize>) -> Self {
        let mut restored = Self {
            items: Vec::with_capacity(values.len()),
            max,
        };
        for value in values {
            let value = value.trim();
            if value.is_empty() || restored.contains(value) {
                continue;
            }
            if max.is_some_and(|m| restored.items.len() >= m) {
                break;
            }
            restored.items.push(value.to_string());
        }
        restored
    }
}

impl Serialize for TagCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
