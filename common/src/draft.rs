//! 下書きの保存と復元
//!
//! 保存先は名前付きのスロット1つ（ブラウザの localStorage 相当）。
//! 読み込みに失敗した下書きは「下書きなし」として扱い、呼び出し側へは伝えない。

use crate::error::{Error, Result};
use crate::fields::ProductFields;
use crate::images::ImageDraft;
use crate::variants::VariantDraft;
use serde::{Deserialize, Serialize};

/// 保存される下書き
///
/// 画像はdata URIとメイン指定のみ。ファイル本体は保存しない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub current_step: u8,
    #[serde(flatten)]
    pub fields: ProductFields,
    pub tags: Vec<String>,
    pub variants: Vec<VariantDraft>,
    pub next_variant_id: u64,
    pub uploaded_images: Vec<ImageDraft>,
}

/// 永続化スロット（get/set/delete のみ、トランザクションなし）
pub trait DraftSlot {
    fn get(&self) -> Result<Option<String>>;
    fn set(&mut self, value: &str) -> Result<()>;
    fn remove(&mut self) -> Result<()>;
}

/// メモリ上のスロット
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
    /// 保存できる最大バイト数（容量超過の再現用）
    limit: Option<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            value: None,
            limit: Some(limit),
        }
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            limit: None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl DraftSlot for MemorySlot {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn set(&mut self, value: &str) -> Result<()> {
        if let Some(limit) = self.limit {
            if value.len() > limit {
                return Err(Error::Storage(format!(
                    "容量を超えています（{} / {} bytes）",
                    value.len(),
                    limit
                )));
            }
        }
        self.value = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}

/// 自動保存の状態表示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Failed(String),
}

impl SaveStatus {
    pub fn label(&self) -> &str {
        match self {
            SaveStatus::Idle => "未保存",
            SaveStatus::Saving => "保存中...",
            SaveStatus::Saved => "保存済み",
            SaveStatus::Failed(_) => "保存失敗",
        }
    }
}

#[derive(Debug)]
pub struct DraftStore<S: DraftSlot> {
    slot: S,
}

impl<S: DraftSlot> DraftStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// 下書きを保存（既存の値は無条件に上書き）
    pub fn save(&mut self, draft: &Draft) -> Result<()> {
        let text = serde_json::to_string(draft)?;
        self.slot.set(&text)
    }

    /// 下書きを読み込む
    ///
    /// 存在しない・壊れている場合は None。
    pub fn load(&self) -> Option<Draft> {
        let text = match self.slot.get() {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                eprintln!("⚠ 下書きを読み込めません: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(draft) => Some(draft),
            Err(e) => {
                eprintln!("⚠ 下書きの形式が不正です: {}", e);
                None
            }
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.slot.remove()
    }

    /// 下書きが保存されているか（ページ離脱時の確認用）
    pub fn exists(&self) -> bool {
        matches!(self.slot.get(), Ok(Some(_)))
    }

    /// 自動保存用。失敗は状態として返すだけで伝播しない
    pub fn autosave(&mut self, draft: &Draft) -> SaveStatus {
        match self.save(draft) {
            Ok(()) => SaveStatus::Saved,
            Err(e) => SaveStatus::Failed(e.to_string()),
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::VariantId;

    fn sample_draft() -> Draft {
        Draft {
            current_step: 3,
            fields: ProductFields {
                product_name: "ステンレスボトル".into(),
                sku: "PRD-TEST-ABCDE".into(),
                category_id: "sports".into(),
                regular_price: "2980".into(),
                sale_price: "2480".into(),
                stock_quantity: "40".into(),
                detailed_description: "<p>保冷・保温対応</p>".into(),
                ..Default::default()
            },
            tags: vec!["保冷".into(), "アウトドア".into()],
            variants: vec![VariantDraft {
                id: serde_json::from_str::<VariantId>("0").unwrap(),
                name: "容量".into(),
                values: vec!["500ml".into(), "750ml".into()],
            }],
            next_variant_id: 1,
            uploaded_images: vec![
                ImageDraft { data_url: "data:image/png;base64,AA==".into(), is_primary: false },
                ImageDraft { data_url: "data:image/png;base64,AQ==".into(), is_primary: true },
            ],
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut store = DraftStore::new(MemorySlot::new());
        let draft = sample_draft();
        store.save(&draft).expect("保存失敗");
        assert_eq!(store.load(), Some(draft));
    }

    #[test]
    fn test_save_overwrites() {
        let mut store = DraftStore::new(MemorySlot::new());
        store.save(&sample_draft()).unwrap();
        let second = Draft {
            current_step: 1,
            ..Default::default()
        };
        store.save(&second).unwrap();
        assert_eq!(store.load(), Some(second));
    }

    #[test]
    fn test_load_absent() {
        let store = DraftStore::new(MemorySlot::new());
        assert_eq!(store.load(), None);
        assert!(!store.exists());
    }

    #[test]
    fn test_load_malformed_returns_none() {
        let store = DraftStore::new(MemorySlot::with_value("{not json"));
        assert_eq!(store.load(), None);
        // スロット自体は残る
        assert!(store.exists());
    }

    #[test]
    fn test_load_ignores_unknown_keys() {
        let store = DraftStore::new(MemorySlot::with_value(
            r#"{"productName": "古い下書き", "customOffers": ["x"], "someRemovedField": 3}"#,
        ));
        let draft = store.load().expect("下書きがない");
        assert_eq!(draft.fields.product_name, "古い下書き");
        assert_eq!(draft.fields.custom_offers, vec!["x"]);
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_json_shape_is_flat() {
        let mut store = DraftStore::new(MemorySlot::new());
        store.save(&sample_draft()).unwrap();
        let raw: serde_json::Value = serde_json::from_str(store.slot().raw().unwrap()).unwrap();
        assert_eq!(raw["productName"], "ステンレスボトル");
        assert_eq!(raw["currentStep"], 3);
        assert_eq!(raw["uploadedImages"][1]["isPrimary"], true);
        assert_eq!(raw["variants"][0]["id"], 0);
    }

    #[test]
    fn test_clear() {
        let mut store = DraftStore::new(MemorySlot::new());
        store.save(&sample_draft()).unwrap();
        assert!(store.exists());
        store.clear().unwrap();
        assert!(!store.exists());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_oversized_draft_is_reported() {
        let mut store = DraftStore::new(MemorySlot::with_limit(16));
        let result = store.save(&sample_draft());
        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(matches!(store.autosave(&sample_draft()), SaveStatus::Failed(_)));
        assert!(!store.exists());
    }
}
