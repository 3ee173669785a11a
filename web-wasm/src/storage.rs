//! localStorage の下書きスロット

use gloo::storage::{LocalStorage, Storage};
use product_wizard_common::{DraftSlot, Error, Result};
use wasm_bindgen::JsValue;

#[derive(Debug, Clone)]
pub struct LocalStorageSlot {
    key: String,
}

impl LocalStorageSlot {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

fn storage_error(e: JsValue) -> Error {
    // 容量超過（QuotaExceededError）もここに来る
    Error::Storage(format!("{:?}", e))
}

impl DraftSlot for LocalStorageSlot {
    fn get(&self) -> Result<Option<String>> {
        LocalStorage::raw().get_item(&self.key).map_err(storage_error)
    }

    fn set(&mut self, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(&self.key, value)
            .map_err(storage_error)
    }

    fn remove(&mut self) -> Result<()> {
        LocalStorage::delete(&self.key);
        Ok(())
    }
}
