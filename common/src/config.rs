//! フォーム設定
//!
//! 上限値・自動保存間隔・選択肢カタログをまとめて保持する。
//! JSONから読み込む場合、欠けている項目はデフォルト値になる。

use serde::{Deserialize, Serialize};

/// 「その他」を表す選択肢の値（自由入力欄を使う）
pub const OTHER_OPTION: &str = "other";

/// 中古品を表す状態値（使用感グレードが有効になる）
pub const USED_CONDITION: &str = "used";

/// 選択肢（値と表示ラベル）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// 選択肢カタログ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    pub categories: Vec<SelectOption>,
    pub brands: Vec<SelectOption>,
    pub conditions: Vec<SelectOption>,
    pub usage_grades: Vec<SelectOption>,
    pub currencies: Vec<String>,
    pub offers: Vec<String>,
}

impl Catalog {
    /// 値に対応する表示ラベルを返す（見つからなければ空文字）
    pub fn label<'a>(options: &'a [SelectOption], value: &str) -> &'a str {
        if value.is_empty() {
            return "";
        }
        options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
            .unwrap_or("")
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            categories: vec![
                SelectOption::new("electronics", "家電・電子機器"),
                SelectOption::new("fashion", "ファッション"),
                SelectOption::new("home", "ホーム・キッチン"),
                SelectOption::new("sports", "スポーツ・アウトドア"),
                SelectOption::new("books", "本・雑誌"),
                SelectOption::new(OTHER_OPTION, "その他"),
            ],
            brands: vec![
                SelectOption::new("generic", "ノーブランド"),
                SelectOption::new("house", "自社ブランド"),
                SelectOption::new(OTHER_OPTION, "その他"),
            ],
            conditions: vec![
                SelectOption::new("new", "新品"),
                SelectOption::new(USED_CONDITION, "中古"),
                SelectOption::new("refurbished", "再生品"),
            ],
            usage_grades: vec![
                SelectOption::new("like_new", "未使用に近い"),
                SelectOption::new("good", "目立った傷なし"),
                SelectOption::new("fair", "やや傷あり"),
                SelectOption::new("poor", "傷や汚れあり"),
            ],
            currencies: vec!["JPY".into(), "USD".into(), "EUR".into()],
            offers: vec![
                "送料無料".into(),
                "ギフト包装無料".into(),
                "30日間返品保証".into(),
            ],
        }
    }
}

/// フォーム全体の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormConfig {
    /// 商品タグの上限
    pub max_tags: usize,
    /// 画像枚数の上限
    pub max_images: usize,
    /// 自動保存の間隔（ミリ秒）
    pub autosave_interval_ms: u64,
    /// 下書きの保存キー
    pub storage_key: String,
    pub catalog: Catalog,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_tags: 5,
            max_images: 5,
            autosave_interval_ms: 30_000,
            storage_key: "productDraft".into(),
            catalog: Catalog::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_config_default() {
        let config = FormConfig::default();
        assert_eq!(config.max_tags, 5);
        assert_eq!(config.max_images, 5);
        assert_eq!(config.autosave_interval_ms, 30_000);
        assert_eq!(config.storage_key, "productDraft");
    }

    #[test]
    fn test_form_config_partial_json() {
        let json = r#"{"maxTags": 8, "unknownKey": true}"#;
        let config: FormConfig = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(config.max_tags, 8);
        assert_eq!(config.max_images, 5); // デフォルト値
        assert!(!config.catalog.categories.is_empty());
    }

    #[test]
    fn test_catalog_label() {
        let catalog = Catalog::default();
        assert_eq!(Catalog::label(&catalog.categories, "fashion"), "ファッション");
        assert_eq!(Catalog::label(&catalog.categories, "missing"), "");
        assert_eq!(Catalog::label(&catalog.categories, ""), "");
    }
}
