//! 画像ファイルの読み込み（FileReader）
//!
//! 枚数は読み込み開始前にまとめて確認し、完了した順にセッションへ追加する。

use crate::bindings::SharedSession;
use product_wizard_common::ImagePayload;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileList, FileReader};

pub fn read_files(files: FileList, session: SharedSession, on_loaded: Option<js_sys::Function>) {
    let count = files.length() as usize;
    {
        let Ok(session) = session.try_borrow() else {
            return;
        };
        if !session.admit_images(count) {
            return;
        }
    }

    for i in 0..files.length() {
        let Some(file) = files.get(i) else {
            continue;
        };
        if !file.type_().starts_with("image/") {
            if let Ok(session) = session.try_borrow() {
                session.reject_non_image();
            }
            continue;
        }
        if let Err(e) = read_file(file, session.clone(), on_loaded.clone()) {
            web_sys::console::error_1(&e);
        }
    }
}

fn read_file(
    file: File,
    session: SharedSession,
    on_loaded: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    let file_name = file.name();
    let reader = FileReader::new()?;

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) else {
            return;
        };
        let payload = ImagePayload::from_data_url(&file_name, &data_url);
        let added = match session.try_borrow_mut() {
            Ok(mut session) => session.image_loaded(payload, data_url),
            Err(_) => false,
        };
        if added {
            if let Some(callback) = &on_loaded {
                let _ = callback.call0(&JsValue::NULL);
            }
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    reader.read_as_data_url(&file)
}
