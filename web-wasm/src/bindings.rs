//! ページから呼ぶ商品登録フォームのハンドル
//!
//! 1ページに1つ作り、ページ側の入力イベントからメソッドを呼ぶ。
//! 自動保存のタイマーはハンドルが持ち、`stopAutosave`・送信・キャンセル・破棄で止まる。

use crate::editor::EditorHandle;
use crate::notify::{BrowserConfirm, JsNotifier};
use crate::storage::LocalStorageSlot;
use crate::transport::FormDataTransport;
use crate::upload;
use gloo::timers::callback::Interval;
use js_sys::Function;
use product_wizard_common::sku::format_sku;
use product_wizard_common::{FormConfig, FormSession, Navigation, PreviewModel, Step, VariantId};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::FileList;

pub type BrowserSession = FormSession<LocalStorageSlot, JsNotifier>;
pub type SharedSession = Rc<RefCell<BrowserSession>>;

/// ステップ移動の結果（JS向け）
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NavigationView {
    moved: bool,
    step: u8,
    progress: f32,
    errors: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<PreviewModel>,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn busy() -> JsValue {
    JsValue::from_str("フォームが処理中です")
}

fn new_sku() -> String {
    let entropy = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    format_sku(js_sys::Date::now() as u64, entropy)
}

#[wasm_bindgen]
pub struct WizardHandle {
    session: SharedSession,
    editor: EditorHandle,
    autosave: Option<Interval>,
}

impl WizardHandle {
    fn with<R>(&self, f: impl FnOnce(&mut BrowserSession) -> R) -> Result<R, JsValue> {
        let mut session = self.session.try_borrow_mut().map_err(|_| busy())?;
        Ok(f(&mut session))
    }
}

#[wasm_bindgen]
impl WizardHandle {
    /// `config` は省略可（FormConfig のJSON表現）
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        mut editor: EditorHandle,
        on_notify: Option<Function>,
    ) -> Result<WizardHandle, JsValue> {
        let config: FormConfig = if config.is_undefined() || config.is_null() {
            FormConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let slot = LocalStorageSlot::new(&config.storage_key);
        let session = FormSession::start(
            config,
            slot,
            JsNotifier::new(on_notify),
            &mut editor,
            new_sku(),
        );
        Ok(WizardHandle {
            session: Rc::new(RefCell::new(session)),
            editor,
            autosave: None,
        })
    }

    /// 自動保存を開始（`onStatus(status)` に保存状態を渡す）
    #[wasm_bindgen(js_name = "startAutosave")]
    pub fn start_autosave(&mut self, on_status: Option<Function>) -> Result<(), JsValue> {
        let period = self.with(|s| s.config().autosave_interval_ms)?;
        let millis = u32::try_from(period).unwrap_or(u32::MAX);
        let session = Rc::clone(&self.session);
        let interval = Interval::new(millis, move || {
            let Ok(mut session) = session.try_borrow_mut() else {
                return;
            };
            let status = session.autosave();
            drop(session);
            if let (Some(callback), Ok(value)) = (&on_status, to_js(&status)) {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
        });
        // 置き換えた古いタイマーは破棄で止まる
        self.autosave = Some(interval);
        Ok(())
    }

    #[wasm_bindgen(js_name = "stopAutosave")]
    pub fn stop_autosave(&mut self) {
        self.autosave = None;
    }

    /// 文字列項目の更新
    #[wasm_bindgen(js_name = "setField")]
    pub fn set_field(&self, name: &str, value: String) -> Result<(), JsValue> {
        self.with(|s| {
            let f = s.fields_mut();
            let target = match name {
                "productName" => &mut f.product_name,
                "sku" => &mut f.sku,
                "categoryId" => &mut f.category_id,
                "customCategory" => &mut f.custom_category,
                "brandId" => &mut f.brand_id,
                "customBrand" => &mut f.custom_brand,
                "shortDescription" => &mut f.short_description,
                "videoUrl" => &mut f.video_url,
                "currency" => &mut f.currency,
                "regularPrice" => &mut f.regular_price,
                "salePrice" => &mut f.sale_price,
                "stockQuantity" => &mut f.stock_quantity,
                "productCondition" => &mut f.product_condition,
                "usageGrade" => &mut f.usage_grade,
                _ => return Err(JsValue::from_str(&format!("不明な項目: {}", name))),
            };
            *target = value;
            Ok(())
        })?
    }

    /// 特典（定型・自由入力）
    #[wasm_bindgen(js_name = "setOffers")]
    pub fn set_offers(&self, offers: JsValue, custom_offers: JsValue) -> Result<(), JsValue> {
        let offers: Vec<String> = serde_wasm_bindgen::from_value(offers)?;
        let custom_offers: Vec<String> = serde_wasm_bindgen::from_value(custom_offers)?;
        self.with(|s| {
            let f = s.fields_mut();
            f.offers = offers;
            f.custom_offers = custom_offers;
        })
    }

    /// エディタの内容を取り込む
    #[wasm_bindgen(js_name = "syncDescription")]
    pub fn sync_description(&self) -> Result<(), JsValue> {
        let editor = &self.editor;
        self.with(|s| s.sync_description(editor))
    }

    #[wasm_bindgen(js_name = "shortDescriptionCount")]
    pub fn short_description_count(&self) -> Result<usize, JsValue> {
        self.with(|s| s.state().fields.short_description_count())
    }

    /// 動画URLのエラーメッセージ（問題なければ undefined）
    #[wasm_bindgen(js_name = "checkVideoUrl")]
    pub fn check_video_url(&self) -> Result<Option<String>, JsValue> {
        self.with(|s| s.check_video_url().map(str::to_string))
    }

    #[wasm_bindgen(js_name = "discountPercent")]
    pub fn discount_percent(&self) -> Result<u32, JsValue> {
        self.with(|s| s.discount_percent())
    }

    #[wasm_bindgen(js_name = "regenerateSku")]
    pub fn regenerate_sku(&self) -> Result<String, JsValue> {
        let sku = new_sku();
        self.with(|s| s.set_sku(sku.clone()))?;
        Ok(sku)
    }

    // ---- タグ ----

    #[wasm_bindgen(js_name = "addTag")]
    pub fn add_tag(&self, value: &str) -> Result<bool, JsValue> {
        self.with(|s| s.add_tag(value))
    }

    #[wasm_bindgen(js_name = "removeTag")]
    pub fn remove_tag(&self, index: usize) -> Result<bool, JsValue> {
        self.with(|s| s.remove_tag(index))
    }

    pub fn tags(&self) -> Result<JsValue, JsValue> {
        let tags = self.with(|s| s.state().tags.serialize())?;
        to_js(&tags)
    }

    // ---- バリアント ----

    #[wasm_bindgen(js_name = "addVariant")]
    pub fn add_variant(&self, name: &str) -> Result<u32, JsValue> {
        let id = self.with(|s| s.add_variant(name).value())?;
        u32::try_from(id).map_err(|_| JsValue::from_str("バリアントIDが範囲外です"))
    }

    #[wasm_bindgen(js_name = "renameVariant")]
    pub fn rename_variant(&self, id: u32, name: &str) -> Result<bool, JsValue> {
        self.with(|s| s.rename_variant(VariantId::from(u64::from(id)), name))
    }

    #[wasm_bindgen(js_name = "removeVariant")]
    pub fn remove_variant(&self, id: u32) -> Result<bool, JsValue> {
        self.with(|s| s.remove_variant(VariantId::from(u64::from(id))))
    }

    #[wasm_bindgen(js_name = "addVariantValue")]
    pub fn add_variant_value(&self, id: u32, value: &str) -> Result<bool, JsValue> {
        self.with(|s| s.add_variant_value(VariantId::from(u64::from(id)), value))
    }

    #[wasm_bindgen(js_name = "removeVariantValue")]
    pub fn remove_variant_value(&self, id: u32, index: usize) -> Result<bool, JsValue> {
        self.with(|s| s.remove_variant_value(VariantId::from(u64::from(id)), index))
    }

    pub fn variants(&self) -> Result<JsValue, JsValue> {
        let variants = self.with(|s| s.state().variants.to_drafts())?;
        to_js(&variants)
    }

    // ---- 画像 ----

    /// ファイル選択・ドロップされたファイルを読み込む（`onLoaded()` は1枚ごと）
    #[wasm_bindgen(js_name = "addFiles")]
    pub fn add_files(&self, files: FileList, on_loaded: Option<Function>) {
        upload::read_files(files, Rc::clone(&self.session), on_loaded);
    }

    #[wasm_bindgen(js_name = "setPrimaryImage")]
    pub fn set_primary_image(&self, index: usize) -> Result<bool, JsValue> {
        self.with(|s| s.set_primary_image(index))
    }

    #[wasm_bindgen(js_name = "removeImage")]
    pub fn remove_image(&self, index: usize) -> Result<bool, JsValue> {
        self.with(|s| s.remove_image(index))
    }

    #[wasm_bindgen(js_name = "reorderImages")]
    pub fn reorder_images(&self, from: usize, to: usize) -> Result<bool, JsValue> {
        self.with(|s| s.reorder_images(from, to))
    }

    pub fn images(&self) -> Result<JsValue, JsValue> {
        let images = self.with(|s| s.state().images.to_drafts())?;
        to_js(&images)
    }

    // ---- ステップ ----

    #[wasm_bindgen(js_name = "nextStep")]
    pub fn next_step(&self) -> Result<JsValue, JsValue> {
        let view = self.with(|s| {
            let navigation = s.next_step();
            navigation_view(s, navigation)
        })?;
        to_js(&view)
    }

    #[wasm_bindgen(js_name = "prevStep")]
    pub fn prev_step(&self) -> Result<JsValue, JsValue> {
        let view = self.with(|s| {
            let navigation = s.prev_step();
            navigation_view(s, navigation)
        })?;
        to_js(&view)
    }

    #[wasm_bindgen(js_name = "currentStep")]
    pub fn current_step(&self) -> Result<u8, JsValue> {
        self.with(|s| s.wizard().current().number())
    }

    #[wasm_bindgen(js_name = "stepTitle")]
    pub fn step_title(step: u8) -> Option<String> {
        Step::from_number(step).map(|s| s.title().to_string())
    }

    pub fn progress(&self) -> Result<f32, JsValue> {
        self.with(|s| s.wizard().progress_percent())
    }

    pub fn buttons(&self) -> Result<JsValue, JsValue> {
        let buttons = self.with(|s| s.wizard().buttons())?;
        to_js(&buttons)
    }

    pub fn preview(&self) -> Result<JsValue, JsValue> {
        let model = self.with(|s| s.preview())?;
        to_js(&model)
    }

    // ---- 下書き・送信 ----

    #[wasm_bindgen(js_name = "saveDraft")]
    pub fn save_draft(&self) -> Result<bool, JsValue> {
        self.with(|s| s.save_draft())
    }

    /// 下書き全体（デバッグ表示用）
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let draft = self.with(|s| s.snapshot())?;
        to_js(&draft)
    }

    /// `beforeunload` で確認を出すか
    #[wasm_bindgen(js_name = "shouldConfirmLeave")]
    pub fn should_confirm_leave(&self) -> Result<bool, JsValue> {
        self.with(|s| s.should_confirm_leave())
    }

    /// 全ステップを検証し、`send(formData)` で送信する
    ///
    /// 成功時は遷移先（`products-list`）を返す。
    pub fn submit(&mut self, send: Function) -> Result<String, JsValue> {
        let mut transport = FormDataTransport::new(send);
        let result = self.with(|s| s.submit(&mut transport))?;
        match result {
            Ok(intent) => {
                self.autosave = None;
                Ok(intent.target().to_string())
            }
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// 確認のうえ入力を破棄する。破棄した場合は遷移先を返す
    pub fn cancel(&mut self) -> Result<Option<String>, JsValue> {
        let intent = self.with(|s| s.cancel(&mut BrowserConfirm))?;
        if intent.is_some() {
            self.autosave = None;
        }
        Ok(intent.map(|i| i.target().to_string()))
    }
}

fn navigation_view(session: &BrowserSession, navigation: Navigation) -> NavigationView {
    let wizard = session.wizard();
    let (moved, errors, preview) = match navigation {
        Navigation::Moved { preview, .. } => (true, BTreeMap::new(), preview),
        Navigation::Blocked(result) => (false, result.errors().clone(), None),
        Navigation::Unchanged => (false, BTreeMap::new(), None),
    };
    NavigationView {
        moved,
        step: wizard.current().number(),
        progress: wizard.progress_percent(),
        errors,
        preview,
    }
}
