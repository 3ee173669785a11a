//! バリアント（色・サイズなど）の管理
//!
//! 各バリアントは名前と値リストを自分で持つ。IDはセッション内で単調増加し、
//! 削除後も再利用しない。

use crate::error::CollectionError;
use crate::tags::TagCollection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// IDの上限（JSの安全な整数の最大値）。これ以上のIDは下書きから復元しない
pub const MAX_VARIANT_ID: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(u64);

impl VariantId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// UI層から受け取ったID（存在しないIDは各操作が NotFound を返す）
impl From<u64> for VariantId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "variant_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    id: VariantId,
    pub name: String,
    values: TagCollection,
}

impl Variant {
    pub fn id(&self) -> VariantId {
        self.id
    }

    pub fn values(&self) -> &TagCollection {
        &self.values
    }

    fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.values.is_empty()
    }
}

/// 送信・プレビュー用のバリアント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantEntry {
    pub name: String,
    pub values: Vec<String>,
}

/// 下書き用のバリアント（名前や値が空のものも保存する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
    pub id: VariantId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    variants: Vec<Variant>,
    next_id: u64,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// バリアントを追加して新しいIDを返す
    pub fn add_variant(&mut self, name: &str) -> VariantId {
        let id = VariantId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.variants.push(Variant {
            id,
            name: name.trim().to_string(),
            values: TagCollection::unbounded(),
        });
        id
    }

    pub fn rename(&mut self, id: VariantId, name: &str) -> Result<(), CollectionError> {
        self.get_mut(id)?.name = name.trim().to_string();
        Ok(())
    }

    /// バリアントを削除（存在しなければ何もしない）
    pub fn remove_variant(&mut self, id: VariantId) -> bool {
        let before = self.variants.len();
        self.variants.retain(|v| v.id != id);
        self.variants.len() != before
    }

    pub fn add_value(&mut self, id: VariantId, value: &str) -> Result<bool, CollectionError> {
        self.get_mut(id)?.values.add(value)
    }

    pub fn remove_value(&mut self, id: VariantId, index: usize) -> Result<String, CollectionError> {
        self.get_mut(id)?.values.remove(index)
    }

    pub fn get(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// 名前と値の両方があるバリアントだけを返す
    pub fn collect_for_submission(&self) -> Vec<VariantEntry> {
        self.variants
            .iter()
            .filter(|v| v.is_complete())
            .map(|v| VariantEntry {
                name: v.name.trim().to_string(),
                values: v.values.serialize(),
            })
            .collect()
    }

    pub fn to_drafts(&self) -> Vec<VariantDraft> {
        self.variants
            .iter()
            .map(|v| VariantDraft {
                id: v.id,
                name: v.name.clone(),
                values: v.values.serialize(),
            })
            .collect()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// 下書きから復元
    ///
    /// 次のIDは保存値と復元したIDの最大値+1のうち大きい方。重複IDは先勝ち。
    /// 範囲外のID（`MAX_VARIANT_ID` 以上）を持つ項目は捨て、範囲外の保存値は無視する。
    pub fn from_drafts(drafts: Vec<VariantDraft>, saved_next_id: u64) -> Self {
        let mut set = Self {
            variants: Vec::with_capacity(drafts.len()),
            next_id: if saved_next_id <= MAX_VARIANT_ID { saved_next_id } else { 0 },
        };
        for draft in drafts {
            if draft.id.0 >= MAX_VARIANT_ID || set.get(draft.id).is_some() {
                continue;
            }
            set.next_id = set.next_id.max(draft.id.0 + 1);
            set.variants.push(Variant {
                id: draft.id,
                name: draft.name,
                values: TagCollection::deserialize(draft.values, None),
            });
        }
        set
    }

    fn get_mut(&mut self, id: VariantId) -> Result<&mut Variant, CollectionError> {
        self.variants
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))
    }
}
