//! FormData による送信
//!
//! 送信先への通信はページ側のコールバックが行う。

use js_sys::{Array, Function, Uint8Array};
use product_wizard_common::submission::IMAGE_ATTACHMENT_NAME;
use product_wizard_common::{Error, ImagePayload, Result, SubmissionPayload, SubmissionTransport};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

pub struct FormDataTransport {
    callback: Function,
}

impl FormDataTransport {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

fn js_error(e: JsValue) -> Error {
    Error::Transport(format!("{:?}", e))
}

fn to_blob(file: &ImagePayload) -> std::result::Result<Blob, JsValue> {
    let bytes = Uint8Array::from(file.bytes.as_slice());
    let parts = Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&file.mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

pub fn to_form_data(payload: &SubmissionPayload) -> std::result::Result<FormData, JsValue> {
    let form = FormData::new()?;
    for (name, value) in &payload.fields {
        form.append_with_str(name, value)?;
    }
    for file in &payload.attachments {
        form.append_with_blob_and_filename(IMAGE_ATTACHMENT_NAME, &to_blob(file)?, &file.file_name)?;
    }
    Ok(form)
}

impl SubmissionTransport for FormDataTransport {
    fn send(&mut self, payload: &SubmissionPayload) -> Result<()> {
        let form = to_form_data(payload).map_err(js_error)?;
        self.callback
            .call1(&JsValue::NULL, &form)
            .map_err(js_error)?;
        Ok(())
    }
}
