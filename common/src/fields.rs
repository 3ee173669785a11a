//! フォーム項目の値
//!
//! 数値項目もユーザーが入力した文字列のまま保持し、解釈は検証側で行う。

use serde::{Deserialize, Serialize};

/// 商品登録フォームの全項目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFields {
    pub product_name: String,
    pub sku: String,
    pub category_id: String,
    pub custom_category: String,
    pub brand_id: String,
    pub custom_brand: String,
    pub short_description: String,
    /// 詳細説明（エディタのマークアップ）
    pub detailed_description: String,
    /// 詳細説明のプレーンテキスト。エディタから毎回取り直すので保存しない
    #[serde(skip)]
    pub detailed_text: String,
    pub video_url: String,
    pub currency: String,
    pub regular_price: String,
    pub sale_price: String,
    pub stock_quantity: String,
    pub product_condition: String,
    pub usage_grade: String,
    /// 選択済みの定型オファー
    pub offers: Vec<String>,
    /// 自由入力のオファー
    pub custom_offers: Vec<String>,
}

impl ProductFields {
    /// 下書きの値を上書き復元
    ///
    /// 空の項目は現在の値（初期値）を残す。
    pub fn restore_from(&mut self, saved: ProductFields) {
        fn keep(target: &mut String, value: String) {
            if !value.is_empty() {
                *target = value;
            }
        }
        fn keep_list(target: &mut Vec<String>, value: Vec<String>) {
            if !value.is_empty() {
                *target = value;
            }
        }

        keep(&mut self.product_name, saved.product_name);
        keep(&mut self.sku, saved.sku);
        keep(&mut self.category_id, saved.category_id);
        keep(&mut self.custom_category, saved.custom_category);
        keep(&mut self.brand_id, saved.brand_id);
        keep(&mut self.custom_brand, saved.custom_brand);
        keep(&mut self.short_description, saved.short_description);
        keep(&mut self.detailed_description, saved.detailed_description);
        keep(&mut self.video_url, saved.video_url);
        keep(&mut self.currency, saved.currency);
        keep(&mut self.regular_price, saved.regular_price);
        keep(&mut self.sale_price, saved.sale_price);
        keep(&mut self.stock_quantity, saved.stock_quantity);
        keep(&mut self.product_condition, saved.product_condition);
        keep(&mut self.usage_grade, saved.usage_grade);
        keep_list(&mut self.offers, saved.offers);
        keep_list(&mut self.custom_offers, saved.custom_offers);
    }

    /// 短い説明の文字数（カウンター表示用）
    pub fn short_description_count(&self) -> usize {
        self.short_description.chars().count()
    }

    /// 定型オファーと自由入力オファーをまとめる（空欄は除く）
    pub fn collect_offers(&self) -> Vec<String> {
        self.offers
            .iter()
            .chain(self.custom_offers.iter())
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}
