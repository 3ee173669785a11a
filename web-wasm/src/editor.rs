//! ページ側のリッチテキストエディタ
//!
//! `getText()` / `getHTML()` / `setHTML(html)` を持つJSオブジェクトを受け取る。

use product_wizard_common::RichTextEditor;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    pub type EditorHandle;

    #[wasm_bindgen(method, js_name = "getText")]
    fn get_text(this: &EditorHandle) -> String;

    #[wasm_bindgen(method, js_name = "getHTML")]
    fn get_html(this: &EditorHandle) -> String;

    #[wasm_bindgen(method, js_name = "setHTML")]
    fn set_html(this: &EditorHandle, html: &str);
}

impl RichTextEditor for EditorHandle {
    fn plain_text(&self) -> String {
        self.get_text()
    }

    fn markup(&self) -> String {
        self.get_html()
    }

    fn set_markup(&mut self, markup: &str) {
        self.set_html(markup);
    }
}
