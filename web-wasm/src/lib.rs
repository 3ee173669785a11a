//! Product Wizard Web (WASM)
//!
//! ページのフォーム部品から呼ぶためのバインディング。描画はページ側が行う。

mod bindings;
mod editor;
pub mod notify;
pub mod storage;
pub mod transport;
mod upload;

pub use bindings::WizardHandle;
pub use editor::EditorHandle;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}
