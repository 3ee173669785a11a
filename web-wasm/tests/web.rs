#![cfg(target_arch = "wasm32")]

//! ブラウザ上のテスト（wasm-pack test --headless --chrome）

use product_wizard_common::submission::assemble;
use product_wizard_common::{
    DraftSlot, FormConfig, FormState, ImagePayload, MarkupEditor, RichTextEditor, Step,
};
use product_wizard_wasm::storage::LocalStorageSlot;
use product_wizard_wasm::transport::to_form_data;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_slot_roundtrip() {
    let mut slot = LocalStorageSlot::new("productDraftTest");
    slot.remove().unwrap();
    assert_eq!(slot.get().unwrap(), None);

    slot.set(r#"{"productName":"テスト"}"#).unwrap();
    assert_eq!(slot.get().unwrap().as_deref(), Some(r#"{"productName":"テスト"}"#));

    slot.remove().unwrap();
    assert_eq!(slot.get().unwrap(), None);
}

#[wasm_bindgen_test]
fn form_data_contains_fields_and_files() {
    let mut state = FormState::new(&FormConfig::default());
    let f = &mut state.fields;
    f.product_name = "木製スツール".into();
    f.category_id = "home".into();
    f.short_description = "天然木のスツール".into();
    f.detailed_text = MarkupEditor::new("<p>オーク材を使用しています</p>").plain_text();
    f.regular_price = "8000".into();
    f.stock_quantity = "4".into();
    state
        .images
        .add_many(vec![ImagePayload {
            file_name: "stool.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        }])
        .unwrap();

    let payload = assemble(&state, Step::Preview).unwrap();
    let form = to_form_data(&payload).unwrap();
    assert_eq!(form.get("productName").as_string().as_deref(), Some("木製スツール"));
    assert_eq!(form.get_all("images[]").length(), 1);
}
