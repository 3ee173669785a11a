//! リッチテキストエディタとの境界
//!
//! コアは詳細説明を2つの形で扱う: 検証用のプレーンテキストと、
//! 保存・プレビュー用のマークアップ。マークアップの形式はエディタ側の関心事。

use lazy_static::lazy_static;
use regex::Regex;

pub trait RichTextEditor {
    /// 検証用のプレーンテキスト
    fn plain_text(&self) -> String;
    /// 保存・プレビュー用のマークアップ
    fn markup(&self) -> String;
    /// 下書き復元時にマークアップを書き戻す
    fn set_markup(&mut self, markup: &str);
}

/// HTMLマークアップをそのまま保持するエディタ
///
/// ブラウザ外（CLI・テスト）ではこれを使う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupEditor {
    markup: String,
}

impl MarkupEditor {
    pub fn new(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
        }
    }
}

impl RichTextEditor for MarkupEditor {
    fn plain_text(&self) -> String {
        markup_to_text(&self.markup)
    }

    fn markup(&self) -> String {
        self.markup.clone()
    }

    fn set_markup(&mut self, markup: &str) {
        self.markup = markup.to_string();
    }
}

/// マークアップからプレーンテキストを取り出す
pub fn markup_to_text(markup: &str) -> String {
    lazy_static! {
        static ref BREAK_RE: Regex =
            Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|blockquote|pre)>").unwrap();
        static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    }

    let text = BREAK_RE.replace_all(markup, "\n");
    let text = TAG_RE.replace_all(&text, "");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// プレーンテキストを段落マークアップに変換（CLI入力用）
pub fn text_to_markup(text: &str) -> String {
    text.lines()
        .map(|line| {
            let escaped = line
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            if escaped.trim().is_empty() {
                "<p></p>".to_string()
            } else {
                format!("<p>{}</p>", escaped)
            }
        })
        .collect()
}
