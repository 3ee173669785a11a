//! ステップごとの入力検証
//!
//! 副作用のない関数だけで構成する。エラー表示はUI側の責務。
//! 1つのステップ内では全項目を検査してから結果を返す。

use crate::state::FormState;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// 詳細説明の最小文字数
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// ウィザードのステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    BasicInfo = 1,
    Pricing = 2,
    Inventory = 3,
    Media = 4,
    Preview = 5,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::BasicInfo,
        Step::Pricing,
        Step::Inventory,
        Step::Media,
        Step::Preview,
    ];

    /// 入力を伴うステップ（送信前に全て検証する）
    pub const INPUT_STEPS: [Step; 4] = [Step::BasicInfo, Step::Pricing, Step::Inventory, Step::Media];

    pub const TOTAL: u8 = 5;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Step> {
        Step::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn next(self) -> Step {
        Step::from_number(self.number() + 1).unwrap_or(Step::Preview)
    }

    pub fn prev(self) -> Step {
        Step::from_number(self.number().saturating_sub(1)).unwrap_or(Step::BasicInfo)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::BasicInfo => "基本情報",
            Step::Pricing => "価格",
            Step::Inventory => "在庫",
            Step::Media => "画像",
            Step::Preview => "プレビュー",
        }
    }
}

/// 検証結果（項目名 → エラーメッセージ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    fn push(&mut self, field: &'static str, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

/// 数値として解釈する（空・非数・無限大は None）
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 指定ステップを検証
pub fn validate_step(step: Step, state: &FormState) -> ValidationResult {
    let mut result = ValidationResult::default();
    match step {
        Step::BasicInfo => validate_basic_info(state, &mut result),
        Step::Pricing => validate_pricing(state, &mut result),
        Step::Inventory => validate_inventory(state, &mut result),
        Step::Media => validate_media(state, &mut result),
        Step::Preview => {}
    }
    result
}

/// 入力ステップを順に検証し、最初に失敗したステップを返す
pub fn first_invalid_step(state: &FormState) -> Option<(Step, ValidationResult)> {
    Step::INPUT_STEPS
        .into_iter()
        .map(|step| (step, validate_step(step, state)))
        .find(|(_, result)| !result.is_valid())
}

fn validate_basic_info(state: &FormState, result: &mut ValidationResult) {
    let fields = &state.fields;

    if fields.product_name.trim().is_empty() {
        result.push("productName", "商品名は必須です");
    }
    if fields.category_id.is_empty() {
        result.push("categoryId", "カテゴリを選択してください");
    }
    if fields.short_description.trim().is_empty() {
        result.push("shortDescription", "短い説明は必須です");
    }
    let detailed = fields.detailed_text.trim();
    if detailed.is_empty() || detailed.chars().count() < MIN_DESCRIPTION_CHARS {
        result.push("detailedDescription", "詳細説明は必須です（10文字以上）");
    }
}

fn validate_pricing(state: &FormState, result: &mut ValidationResult) {
    let regular = parse_number(&state.fields.regular_price);
    if !regular.is_some_and(|r| r > 0.0) {
        result.push("regularPrice", "通常価格は必須で、0より大きい必要があります");
    }

    // 通常価格が数値でなければ比較しない
    if let (Some(regular), Some(sale)) = (regular, parse_number(&state.fields.sale_price)) {
        if sale != 0.0 && sale >= regular {
            result.push("salePrice", "セール価格は通常価格より低くしてください");
        }
    }
}

fn validate_inventory(state: &FormState, result: &mut ValidationResult) {
    if state.fields.stock_quantity.trim().parse::<u64>().is_err() {
        result.push("stockQuantity", "在庫数は0以上の整数で入力してください");
    }
}

fn validate_media(state: &FormState, result: &mut ValidationResult) {
    if state.images.is_empty() {
        result.push("images", "画像を1枚以上追加してください");
    }
}

/// 動画URLの検証（YouTube / Vimeo のみ、空欄は可）
///
/// 項目から離れたときに呼ぶ。ステップの進行は妨げない。
pub fn validate_video_url(url: &str) -> Option<&'static str> {
    lazy_static! {
        static ref YOUTUBE_RE: Regex =
            Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+").unwrap();
        static ref VIMEO_RE: Regex = Regex::new(r"^(https?://)?(www\.)?vimeo\.com/.+").unwrap();
    }

    let url = url.trim();
    if url.is_empty() || YOUTUBE_RE.is_match(url) || VIMEO_RE.is_match(url) {
        None
    } else {
        Some("動画URLが不正です。YouTubeまたはVimeoのURLを入力してください")
    }
}
