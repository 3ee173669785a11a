//! 対話式の商品登録
//!
//! ステップごとに dialoguer で入力を受け、フォームセッションへ反映する。
//! セッションは自動保存タスクと共有しているので、入力待ちの間はロックを持たない。

use crate::autosave::SharedSession;
use crate::error::{Result, WizardError};
use crate::media;
use crate::storage::FileSlot;
use crate::terminal::{FixedAnswer, TerminalConfirm, TerminalNotifier};
use crate::transport::DirectoryTransport;
use dialoguer::{Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use product_wizard_common::config::OTHER_OPTION;
use product_wizard_common::config::USED_CONDITION;
use product_wizard_common::editor::text_to_markup;
use product_wizard_common::{
    ConfirmDialog, FormSession, Gallery, MarkupEditor, Navigation, PreviewModel, RichTextEditor,
    SelectOption, Step, SubmissionError, ValidationResult,
};
use std::path::PathBuf;

pub type WizardSession = FormSession<FileSlot, TerminalNotifier>;

/// 対話の終わり方
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Submitted(Option<PathBuf>),
    Saved,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Previous,
    Submit,
    SaveAndQuit,
    Cancel,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Next => "次へ",
            Action::Previous => "戻る",
            Action::Submit => "登録する",
            Action::SaveAndQuit => "下書きを保存して中断",
            Action::Cancel => "キャンセル",
        }
    }
}

pub fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(u64::from(Step::TOTAL));
    let style = ProgressStyle::with_template("[{bar:25}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb
}

pub struct InteractiveForm {
    session: SharedSession<FileSlot, TerminalNotifier>,
    editor: MarkupEditor,
    progress: ProgressBar,
    transport: DirectoryTransport,
}

impl InteractiveForm {
    pub fn new(
        session: SharedSession<FileSlot, TerminalNotifier>,
        editor: MarkupEditor,
        progress: ProgressBar,
        transport: DirectoryTransport,
    ) -> Self {
        Self {
            session,
            editor,
            progress,
            transport,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut WizardSession) -> R) -> Result<R> {
        let mut session = self.session.lock().map_err(|_| WizardError::SessionLock)?;
        Ok(f(&mut session))
    }

    fn show_step(&self, step: Step) {
        self.progress.set_position(u64::from(step.number()));
        self.progress.set_message(step.title());
    }

    pub fn run(&mut self) -> Result<Outcome> {
        loop {
            let (step, buttons) = self.with(|s| (s.wizard().current(), s.wizard().buttons()))?;
            self.show_step(step);
            self.progress.println(format!("\n── ステップ{}: {} ──", step.number(), step.title()));

            match step {
                Step::BasicInfo => self.basic_info()?,
                Step::Pricing => self.pricing()?,
                Step::Inventory => self.inventory()?,
                Step::Media => self.media()?,
                Step::Preview => {
                    let model = self.with(|s| s.preview())?;
                    self.progress.println(render_preview(&model));
                }
            }

            let mut actions = Vec::new();
            if buttons.next {
                actions.push(Action::Next);
            }
            if buttons.submit {
                actions.push(Action::Submit);
            }
            if buttons.previous {
                actions.push(Action::Previous);
            }
            actions.push(Action::SaveAndQuit);
            actions.push(Action::Cancel);
            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
            let chosen = Select::new()
                .with_prompt("操作")
                .items(&labels)
                .default(0)
                .interact()?;

            match actions[chosen] {
                Action::Next => {
                    if let Navigation::Blocked(result) = self.with(|s| s.next_step())? {
                        self.progress.println(render_errors(&result));
                    }
                }
                Action::Previous => {
                    self.with(|s| s.prev_step())?;
                }
                Action::Submit => {
                    let mut transport = self.transport.clone();
                    match self.with(|s| s.submit(&mut transport))? {
                        Ok(_) => {
                            let output = transport.last_output().map(|p| p.to_path_buf());
                            self.transport = transport;
                            return Ok(Outcome::Submitted(output));
                        }
                        Err(SubmissionError::Invalid { result, .. }) => {
                            self.progress.println(render_errors(&result));
                        }
                        Err(_) => {}
                    }
                }
                Action::SaveAndQuit => {
                    if self.with(|s| s.save_draft())? {
                        return Ok(Outcome::Saved);
                    }
                }
                Action::Cancel => {
                    let answer = TerminalConfirm.confirm(
                        "登録をキャンセル",
                        "キャンセルしてよろしいですか？入力内容はすべて失われます。",
                    );
                    if self.with(|s| s.cancel(&mut FixedAnswer(answer)))?.is_some() {
                        return Ok(Outcome::Cancelled);
                    }
                }
            }
        }
    }

    fn basic_info(&mut self) -> Result<()> {
        let (fields, catalog) =
            self.with(|s| (s.state().fields.clone(), s.config().catalog.clone()))?;

        let product_name = text("商品名", &fields.product_name)?;
        let (category_id, custom_category) = choose(
            "カテゴリ",
            &catalog.categories,
            &fields.category_id,
            &fields.custom_category,
            true,
        )?;
        let (brand_id, custom_brand) =
            choose("ブランド", &catalog.brands, &fields.brand_id, &fields.custom_brand, false)?;
        let short_description = text("短い説明", &fields.short_description)?;
        self.progress
            .println(format!("  {}文字", short_description.chars().count()));

        let initial = fields.detailed_text.trim_end().replace('\n', "\\n");
        let detailed = text("詳細説明（改行は \\n）", &initial)?;
        self.editor.set_markup(&text_to_markup(&detailed.replace("\\n", "\n")));
        let video_url = text("動画URL（YouTube/Vimeo、任意）", &fields.video_url)?;

        let editor = self.editor.clone();
        let warning = self.with(|s| {
            let f = s.fields_mut();
            f.product_name = product_name;
            f.category_id = category_id;
            f.custom_category = custom_category;
            f.brand_id = brand_id;
            f.custom_brand = custom_brand;
            f.short_description = short_description;
            f.video_url = video_url;
            s.sync_description(&editor);
            s.check_video_url()
        })?;
        if let Some(message) = warning {
            self.progress.println(format!("⚠ {}", message));
        }

        self.tags()
    }

    fn tags(&mut self) -> Result<()> {
        loop {
            let current = self.with(|s| s.state().tags.serialize())?;
            self.progress.println(format!("  タグ: {}", numbered(&current)));
            let input = text("タグ（カンマ区切りで追加、-番号で削除、空で次へ）", "")?;
            let input = input.trim();
            if input.is_empty() {
                return Ok(());
            }
            if let Some(index) = parse_removal(input, current.len()) {
                self.with(|s| s.remove_tag(index))?;
                continue;
            }
            for tag in input.split(',') {
                self.with(|s| s.add_tag(tag))?;
            }
        }
    }

    fn pricing(&mut self) -> Result<()> {
        let (fields, catalog) =
            self.with(|s| (s.state().fields.clone(), s.config().catalog.clone()))?;

        let currencies = plain_options(&catalog.currencies);
        let (currency, _) = choose("通貨", &currencies, &fields.currency, "", true)?;
        let regular_price = text("通常価格", &fields.regular_price)?;
        let sale_price = text("セール価格（任意）", &fields.sale_price)?;

        let discount = self.with(|s| {
            let f = s.fields_mut();
            f.currency = currency;
            f.regular_price = regular_price;
            f.sale_price = sale_price;
            s.discount_percent()
        })?;
        if discount > 0 {
            self.progress.println(format!("  割引率: {}%", discount));
        }
        Ok(())
    }

    fn inventory(&mut self) -> Result<()> {
        let (fields, catalog) =
            self.with(|s| (s.state().fields.clone(), s.config().catalog.clone()))?;

        let stock_quantity = text("在庫数", &fields.stock_quantity)?;
        let (condition, _) = choose("状態", &catalog.conditions, &fields.product_condition, "", false)?;
        let usage_grade = if condition == USED_CONDITION {
            choose("使用感", &catalog.usage_grades, &fields.usage_grade, "", false)?.0
        } else {
            fields.usage_grade.clone()
        };

        let offers = if catalog.offers.is_empty() {
            Vec::new()
        } else {
            let picked = MultiSelect::new()
                .with_prompt("特典（スペースで選択）")
                .items(&catalog.offers)
                .defaults(&offer_defaults(&catalog.offers, &fields.offers))
                .interact()?;
            picked_offers(&catalog.offers, &picked)
        };
        let custom = text("その他の特典（カンマ区切り）", &fields.custom_offers.join(","))?;
        let custom_offers = custom.split(',').map(|s| s.trim().to_string()).collect();

        self.with(|s| {
            let f = s.fields_mut();
            f.stock_quantity = stock_quantity;
            f.product_condition = condition;
            f.usage_grade = usage_grade;
            f.offers = offers;
            f.custom_offers = custom_offers;
        })?;

        self.variants()
    }

    fn variants(&mut self) -> Result<()> {
        let existing: Vec<_> = self.with(|s| {
            s.state()
                .variants
                .iter()
                .map(|v| (v.id(), format!("{}: {}", v.name, v.values().serialize().join(", "))))
                .collect()
        })?;
        if !existing.is_empty() {
            let labels: Vec<&str> = existing.iter().map(|(_, l)| l.as_str()).collect();
            let removed = MultiSelect::new()
                .with_prompt("削除するバリアント（なければそのままEnter）")
                .items(&labels)
                .interact()?;
            for i in removed {
                self.with(|s| s.remove_variant(existing[i].0))?;
            }
        }

        loop {
            let name = text("バリアント名（例: サイズ、空で次へ）", "")?;
            if name.trim().is_empty() {
                return Ok(());
            }
            let values = text("値（カンマ区切り）", "")?;
            self.with(|s| {
                let id = s.add_variant(&name);
                for value in values.split(',') {
                    s.add_variant_value(id, value);
                }
            })?;
        }
    }

    fn media(&mut self) -> Result<()> {
        loop {
            let labels = self.with(|s| image_labels(s))?;
            self.progress.println(format!("  画像: {}", numbered(&labels)));
            let input = text("画像ファイル/フォルダ（-番号で削除、空で次へ）", "")?;
            let input = input.trim();
            if input.is_empty() {
                break;
            }
            if let Some(index) = parse_removal(input, labels.len()) {
                self.with(|s| s.remove_image(index))?;
                continue;
            }
            match media::load_paths(&[PathBuf::from(input)]) {
                Ok(files) => {
                    self.with(|s| s.add_images(files))?;
                }
                Err(e) => self.progress.println(format!("⚠ {}", e)),
            }
        }

        let (labels, primary) = self.with(|s| (image_labels(s), s.state().images.primary_index()))?;
        if labels.len() > 1 {
            let index = Select::new()
                .with_prompt("メイン画像")
                .items(&labels)
                .default(primary.unwrap_or(0))
                .interact()?;
            self.with(|s| s.set_primary_image(index))?;
        }
        Ok(())
    }
}

fn text(prompt: &str, initial: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

/// 選択肢から選ぶ。「その他」の場合は自由入力も受ける
fn choose(
    prompt: &str,
    options: &[SelectOption],
    current: &str,
    custom: &str,
    required: bool,
) -> Result<(String, String)> {
    let mut values: Vec<&str> = Vec::new();
    let mut labels: Vec<&str> = Vec::new();
    if !required {
        values.push("");
        labels.push("（未選択）");
    }
    for option in options {
        values.push(&option.value);
        labels.push(&option.label);
    }
    let default = values.iter().position(|v| *v == current).unwrap_or(0);
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;

    let value = values[index].to_string();
    let custom = if value == OTHER_OPTION {
        text(&format!("{}（自由入力）", prompt), custom)?
    } else {
        String::new()
    };
    Ok((value, custom))
}

/// 値そのものを表示ラベルにした選択肢（通貨など）
fn plain_options(values: &[String]) -> Vec<SelectOption> {
    values.iter().map(|v| SelectOption::new(v, v)).collect()
}

/// 保存済みの特典を複数選択の初期状態に変換
fn offer_defaults(offers: &[String], selected: &[String]) -> Vec<bool> {
    offers.iter().map(|o| selected.contains(o)).collect()
}

fn picked_offers(offers: &[String], picked: &[usize]) -> Vec<String> {
    picked.iter().filter_map(|&i| offers.get(i).cloned()).collect()
}

/// `-番号`（1始まり）を削除位置に変換
fn parse_removal(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.strip_prefix('-')?.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn numbered(items: &[String]) -> String {
    if items.is_empty() {
        return "（なし）".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}.{}", i + 1, item))
        .collect::<Vec<_>>()
        .join(" ")
}

fn image_labels(session: &WizardSession) -> Vec<String> {
    session
        .state()
        .images
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let name = record
                .payload()
                .map(|p| p.file_name.clone())
                .unwrap_or_else(|| format!("下書きの画像{}", i + 1));
            if record.is_primary() {
                format!("{}（メイン）", name)
            } else {
                name
            }
        })
        .collect()
}

pub fn render_errors(result: &ValidationResult) -> String {
    result
        .errors()
        .values()
        .map(|message| format!("✖ {}", message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// プレビューの文字表示
pub fn render_preview(model: &PreviewModel) -> String {
    let mut lines = vec![
        format!("商品名: {}", model.product_name),
        format!("SKU: {}", model.sku),
        format!("カテゴリ: {}", model.category),
    ];
    if !model.brand.is_empty() {
        lines.push(format!("ブランド: {}", model.brand));
    }
    lines.push(format!("説明: {}", model.short_description));

    match &model.sale_price {
        Some(sale) if model.discount_percent > 0 => lines.push(format!(
            "価格: {} {}（通常 {}、{}オフ）",
            sale,
            model.currency,
            model.regular_price,
            model.discount_label()
        )),
        _ => lines.push(format!("価格: {} {}", model.regular_price, model.currency)),
    }
    lines.push(format!("在庫: {}", model.stock_quantity));
    if !model.condition.is_empty() {
        match &model.usage_grade {
            Some(grade) => lines.push(format!("状態: {}（{}）", model.condition, grade)),
            None => lines.push(format!("状態: {}", model.condition)),
        }
    }
    for variant in &model.variants {
        lines.push(format!("{}: {}", variant.name, variant.values.join(" / ")));
    }
    if !model.tags.is_empty() {
        lines.push(format!("タグ: {}", model.tags.join(", ")));
    }
    if !model.offers.is_empty() {
        lines.push(format!("特典: {}", model.offers.join(", ")));
    }
    if !model.video_url.is_empty() {
        lines.push(format!("動画: {}", model.video_url));
    }
    match &model.gallery {
        Gallery::Empty => lines.push("画像: なし".to_string()),
        Gallery::Images { thumbnails, .. } => {
            lines.push(format!("画像: {}枚", thumbnails.len().max(1)))
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_wizard_common::{Catalog, FormConfig, FormState};

    #[test]
    fn test_parse_removal() {
        assert_eq!(parse_removal("-1", 2), Some(0));
        assert_eq!(parse_removal("-2", 2), Some(1));
        assert_eq!(parse_removal("-3", 2), None);
        assert_eq!(parse_removal("-0", 2), None);
        assert_eq!(parse_removal("red", 2), None);
    }

    #[test]
    fn test_currency_options_use_value_as_label() {
        let catalog = Catalog::default();
        let options = plain_options(&catalog.currencies);
        assert_eq!(options.len(), catalog.currencies.len());
        assert_eq!(options[0], SelectOption::new("JPY", "JPY"));
    }

    #[test]
    fn test_offer_selection_mapping() {
        let catalog = Catalog::default();
        let saved = vec!["30日間返品保証".to_string(), "廃止された特典".to_string()];
        assert_eq!(offer_defaults(&catalog.offers, &saved), vec![false, false, true]);

        let picked = picked_offers(&catalog.offers, &[0, 2, 9]);
        assert_eq!(picked, vec!["送料無料", "30日間返品保証"]);
    }

    #[test]
    fn test_numbered() {
        assert_eq!(numbered(&[]), "（なし）");
        assert_eq!(numbered(&["a".into(), "b".into()]), "1.a 2.b");
    }

    #[test]
    fn test_render_preview_with_discount() {
        let mut state = FormState::new(&FormConfig::default());
        state.fields.product_name = "帆布トート".into();
        state.fields.category_id = "fashion".into();
        state.fields.currency = "JPY".into();
        state.fields.regular_price = "100".into();
        state.fields.sale_price = "75".into();
        state.fields.stock_quantity = "3".into();
        let model = product_wizard_common::preview::build(&state, &Catalog::default());

        let text = render_preview(&model);
        assert!(text.contains("商品名: 帆布トート"));
        assert!(text.contains("カテゴリ: ファッション"));
        assert!(text.contains("25%オフ"));
        assert!(text.contains("画像: なし"));
    }
}
