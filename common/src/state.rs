//! フォームの状態（項目値＋各コレクション）

use crate::config::FormConfig;
use crate::fields::ProductFields;
use crate::images::ImageSet;
use crate::tags::TagCollection;
use crate::variants::VariantSet;

/// 検証・プレビュー・送信が読み取るフォーム全体の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub fields: ProductFields,
    pub tags: TagCollection,
    pub variants: VariantSet,
    pub images: ImageSet,
}

impl FormState {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            fields: ProductFields::default(),
            tags: TagCollection::bounded(config.max_tags),
            variants: VariantSet::new(),
            images: ImageSet::new(config.max_images),
        }
    }
}
