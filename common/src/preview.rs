//! プレビュー表示用の読み取り専用モデル

use crate::config::{Catalog, SelectOption, OTHER_OPTION, USED_CONDITION};
use crate::state::FormState;
use crate::validation::parse_number;
use crate::variants::VariantEntry;
use serde::Serialize;

/// 画像ギャラリー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Gallery {
    /// 画像なし
    Empty,
    Images {
        primary: String,
        /// 2枚以上のときのみ
        thumbnails: Vec<Thumbnail>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub data_url: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewModel {
    pub product_name: String,
    pub sku: String,
    pub category: String,
    pub brand: String,
    pub short_description: String,
    /// エディタのマークアップをそのまま渡す
    pub detailed_description: String,
    pub video_url: String,
    pub currency: String,
    pub regular_price: String,
    pub sale_price: Option<String>,
    pub discount_percent: u32,
    pub stock_quantity: String,
    pub condition: String,
    pub usage_grade: Option<String>,
    pub variants: Vec<VariantEntry>,
    pub tags: Vec<String>,
    pub offers: Vec<String>,
    pub gallery: Gallery,
}

impl PreviewModel {
    pub fn discount_label(&self) -> String {
        format!("{}%", self.discount_percent)
    }
}

/// 割引率（%）
///
/// 解釈できない価格は0として扱う。セール価格が正で通常価格より低い場合のみ計算する。
pub fn discount_percent(regular: &str, sale: &str) -> u32 {
    let regular = parse_number(regular).unwrap_or(0.0);
    let sale = parse_number(sale).unwrap_or(0.0);
    if regular > 0.0 && sale > 0.0 && sale < regular {
        ((regular - sale) / regular * 100.0).round() as u32
    } else {
        0
    }
}

/// 選択値の表示名
///
/// 「その他」が選ばれ自由入力があればそれを、なければ選択肢のラベルを返す。
pub fn resolve_choice(options: &[SelectOption], value: &str, custom: &str) -> String {
    if value == OTHER_OPTION && !custom.trim().is_empty() {
        return custom.trim().to_string();
    }
    Catalog::label(options, value).to_string()
}

pub fn build_gallery(state: &FormState) -> Gallery {
    let images = &state.images;
    let Some(primary) = images.display_primary() else {
        return Gallery::Empty;
    };
    let thumbnails = if images.len() > 1 {
        images
            .records()
            .iter()
            .map(|r| Thumbnail {
                data_url: r.data_url().to_string(),
                active: r.is_primary(),
            })
            .collect()
    } else {
        Vec::new()
    };
    Gallery::Images {
        primary: primary.data_url().to_string(),
        thumbnails,
    }
}

pub fn build(state: &FormState, catalog: &Catalog) -> PreviewModel {
    let fields = &state.fields;
    let usage_grade = if fields.product_condition == USED_CONDITION {
        Some(Catalog::label(&catalog.usage_grades, &fields.usage_grade))
            .filter(|label| !label.is_empty())
            .map(str::to_string)
    } else {
        None
    };
    let sale_price = Some(fields.sale_price.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    PreviewModel {
        product_name: fields.product_name.trim().to_string(),
        sku: fields.sku.clone(),
        category: resolve_choice(&catalog.categories, &fields.category_id, &fields.custom_category),
        brand: resolve_choice(&catalog.brands, &fields.brand_id, &fields.custom_brand),
        short_description: fields.short_description.clone(),
        detailed_description: fields.detailed_description.clone(),
        video_url: fields.video_url.trim().to_string(),
        currency: fields.currency.clone(),
        regular_price: fields.regular_price.trim().to_string(),
        sale_price,
        discount_percent: discount_percent(&fields.regular_price, &fields.sale_price),
        stock_quantity: fields.stock_quantity.trim().to_string(),
        condition: Catalog::label(&catalog.conditions, &fields.product_condition).to_string(),
        usage_grade,
        variants: state.variants.collect_for_submission(),
        tags: state.tags.serialize(),
        offers: fields.collect_offers(),
        gallery: build_gallery(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormConfig;
    use crate::images::ImageDraft;
    use crate::images::ImageSet;

    fn state() -> FormState {
        FormState::new(&FormConfig::default())
    }

    #[test]
    fn test_discount_table() {
        assert_eq!(discount_percent("100", "75"), 25);
        assert_eq!(discount_percent("100", "100"), 0);
        assert_eq!(discount_percent("100", ""), 0);
        assert_eq!(discount_percent("0", "50"), 0);
        assert_eq!(discount_percent("abc", "50"), 0);
        assert_eq!(discount_percent("100", "150"), 0);
        assert_eq!(discount_percent("100", "-10"), 0);
    }

    #[test]
    fn test_discount_rounds() {
        assert_eq!(discount_percent("3", "2"), 33);
        assert_eq!(discount_percent("8", "7"), 13); // 12.5 → 13
    }

    #[test]
    fn test_resolve_choice() {
        let catalog = Catalog::default();
        assert_eq!(resolve_choice(&catalog.categories, "home", "ignored"), "ホーム・キッチン");
        assert_eq!(resolve_choice(&catalog.categories, "other", " 手作り雑貨 "), "手作り雑貨");
        assert_eq!(resolve_choice(&catalog.categories, "other", "  "), "その他");
        assert_eq!(resolve_choice(&catalog.brands, "", ""), "");
    }

    #[test]
    fn test_gallery_empty() {
        assert_eq!(build_gallery(&state()), Gallery::Empty);
    }

    #[test]
    fn test_gallery_single_image_has_no_thumbnails() {
        let mut s = state();
        s.images = ImageSet::from_drafts(
            vec![ImageDraft { data_url: "data:a".into(), is_primary: true }],
            5,
        );
        assert_eq!(
            build_gallery(&s),
            Gallery::Images { primary: "data:a".into(), thumbnails: vec![] }
        );
    }

    #[test]
    fn test_gallery_uses_primary() {
        let mut s = state();
        s.images = ImageSet::from_drafts(
            vec![
                ImageDraft { data_url: "data:a".into(), is_primary: false },
                ImageDraft { data_url: "data:b".into(), is_primary: true },
            ],
            5,
        );
        match build_gallery(&s) {
            Gallery::Images { primary, thumbnails } => {
                assert_eq!(primary, "data:b");
                assert_eq!(thumbnails.len(), 2);
                assert!(!thumbnails[0].active);
                assert!(thumbnails[1].active);
            }
            Gallery::Empty => panic!("ギャラリーが空"),
        }
    }

    #[test]
    fn test_build_preview() {
        let catalog = Catalog::default();
        let mut s = state();
        s.fields.product_name = " 革財布 ".into();
        s.fields.category_id = "other".into();
        s.fields.custom_category = "革小物".into();
        s.fields.brand_id = "house".into();
        s.fields.regular_price = "100".into();
        s.fields.sale_price = "75".into();
        s.fields.product_condition = "used".into();
        s.fields.usage_grade = "good".into();
        s.tags.add("本革").unwrap();
        let unnamed = s.variants.add_variant("");
        s.variants.add_value(unnamed, "黒").unwrap();

        let preview = build(&s, &catalog);
        assert_eq!(preview.product_name, "革財布");
        assert_eq!(preview.category, "革小物");
        assert_eq!(preview.brand, "自社ブランド");
        assert_eq!(preview.discount_label(), "25%");
        assert_eq!(preview.sale_price.as_deref(), Some("75"));
        assert_eq!(preview.condition, "中古");
        assert_eq!(preview.usage_grade.as_deref(), Some("目立った傷なし"));
        assert_eq!(preview.tags, vec!["本革"]);
        assert!(preview.variants.is_empty());
        assert_eq!(preview.gallery, Gallery::Empty);
    }

    #[test]
    fn test_usage_grade_hidden_unless_used() {
        let mut s = state();
        s.fields.product_condition = "new".into();
        s.fields.usage_grade = "good".into();
        assert_eq!(build(&s, &Catalog::default()).usage_grade, None);
    }
}
