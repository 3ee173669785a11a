//! 送信データの組み立て
//!
//! 入力ステップを全て検証してから、文字列項目・構造化項目（JSON文字列）と
//! 画像ファイルを分けて multipart 相当のペイロードにする。

use crate::images::ImagePayload;
use crate::state::FormState;
use crate::validation::{first_invalid_step, Step, ValidationResult};
use serde::Serialize;
use thiserror::Error;

/// 画像ファイルの送信項目名
pub const IMAGE_ATTACHMENT_NAME: &str = "images[]";

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("ステップ{}（{}）に入力エラーがあります", .step.number(), .step.title())]
    Invalid { step: Step, result: ValidationResult },

    #[error("送信データの変換に失敗: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("送信に失敗: {0}")]
    Transport(String),
}

/// 画像のメタデータ（`images` 項目にJSONで入る）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMeta {
    pub position: usize,
    pub is_primary: bool,
    /// 添付ファイルの番号（新規追加の画像のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<usize>,
    /// 下書きから復元した画像はファイルがないのでdata URIを送る
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    /// 送信順の (項目名, 値)
    pub fields: Vec<(String, String)>,
    pub attachments: Vec<ImagePayload>,
}

impl SubmissionPayload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 文字列項目をJSONオブジェクトにまとめる
    pub fn fields_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }

    fn push(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }

    fn push_json<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), SubmissionError> {
        let text = serde_json::to_string(value)?;
        self.push(name, text);
        Ok(())
    }
}

pub fn assemble(state: &FormState, current_step: Step) -> Result<SubmissionPayload, SubmissionError> {
    if let Some((step, result)) = first_invalid_step(state) {
        return Err(SubmissionError::Invalid { step, result });
    }

    let f = &state.fields;
    let mut payload = SubmissionPayload::default();
    payload.push("currentStep", current_step.number().to_string());
    payload.push("productName", f.product_name.trim());
    payload.push("sku", f.sku.as_str());
    payload.push("categoryId", f.category_id.as_str());
    payload.push("customCategory", f.custom_category.trim());
    payload.push("brandId", f.brand_id.as_str());
    payload.push("customBrand", f.custom_brand.trim());
    payload.push("shortDescription", f.short_description.trim());
    payload.push("detailedDescription", f.detailed_description.as_str());
    payload.push("videoUrl", f.video_url.trim());
    payload.push("currency", f.currency.as_str());
    payload.push("regularPrice", f.regular_price.trim());
    payload.push("salePrice", f.sale_price.trim());
    payload.push("stockQuantity", f.stock_quantity.trim());
    payload.push("productCondition", f.product_condition.as_str());
    payload.push("usageGrade", f.usage_grade.as_str());

    payload.push_json("tags", &state.tags)?;
    payload.push_json("variants", &state.variants.collect_for_submission())?;
    payload.push_json("offers", &f.collect_offers())?;

    let mut images = Vec::with_capacity(state.images.len());
    for (position, record) in state.images.records().iter().enumerate() {
        let attachment = record.payload().map(|file| {
            payload.attachments.push(file.clone());
            payload.attachments.len() - 1
        });
        images.push(ImageMeta {
            position,
            is_primary: record.is_primary(),
            attachment,
            data_url: attachment.is_none().then(|| record.data_url().to_string()),
        });
    }
    payload.push_json("images", &images)?;
    let primary = state
        .images
        .primary_index()
        .map(|i| i.to_string())
        .unwrap_or_default();
    payload.push("primaryImageIndex", primary);

    Ok(payload)
}
