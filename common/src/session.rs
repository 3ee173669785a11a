//! フォーム入力セッション
//!
//! 1回の商品登録の間、項目値・コレクション・ステップ・下書き保存先を所有する。
//! UI層はこのセッションの操作だけを呼び、結果の通知は `Notifier` 経由で受け取る。
//! 自動保存タイマーはホスト側が持ち、`autosave` を呼ぶ。終了後の呼び出しは無視する。

use crate::config::FormConfig;
use crate::draft::{Draft, DraftSlot, DraftStore, SaveStatus};
use crate::editor::RichTextEditor;
use crate::error::CollectionError;
use crate::images::{ImagePayload, ImageSet};
use crate::interaction::{ConfirmDialog, NavigationIntent, Notifier, Severity, SubmissionTransport};
use crate::preview::{self, PreviewModel};
use crate::state::FormState;
use crate::submission::{self, SubmissionError};
use crate::tags::TagCollection;
use crate::validation::{validate_video_url, Step, ValidationResult};
use crate::variants::{VariantId, VariantSet};
use crate::wizard::{Advance, WizardController};

/// ステップ移動の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// 移動した。プレビューに入った場合はモデルを含む
    Moved {
        step: Step,
        preview: Option<PreviewModel>,
    },
    Blocked(ValidationResult),
    Unchanged,
}

pub struct FormSession<S: DraftSlot, N: Notifier> {
    config: FormConfig,
    state: FormState,
    wizard: WizardController,
    drafts: DraftStore<S>,
    notifier: N,
    ended: bool,
}

impl<S: DraftSlot, N: Notifier> FormSession<S, N> {
    /// セッション開始
    ///
    /// 下書きがあれば復元し、詳細説明はエディタへ書き戻してからプレーンテキストを取り直す。
    /// 保存時のステップ位置は復元せず、常にステップ1から始める。
    pub fn start(
        config: FormConfig,
        slot: S,
        notifier: N,
        editor: &mut dyn RichTextEditor,
        sku: String,
    ) -> Self {
        let mut state = FormState::new(&config);
        state.fields.sku = sku;
        if let Some(currency) = config.catalog.currencies.first() {
            state.fields.currency = currency.clone();
        }

        let drafts = DraftStore::new(slot);
        let restored = drafts.load();

        let mut session = Self {
            config,
            state,
            wizard: WizardController::new(),
            drafts,
            notifier,
            ended: false,
        };
        if let Some(draft) = restored {
            session.restore(draft);
            editor.set_markup(&session.state.fields.detailed_description);
            session.state.fields.detailed_text = editor.plain_text();
            session.notifier.notify("下書きを読み込みました", Severity::Info);
        }
        session
    }

    fn restore(&mut self, draft: Draft) {
        self.state.fields.restore_from(draft.fields);
        self.state.tags = TagCollection::deserialize(draft.tags, Some(self.config.max_tags));
        self.state.variants = VariantSet::from_drafts(draft.variants, draft.next_variant_id);
        self.state.images = ImageSet::from_drafts(draft.uploaded_images, self.config.max_images);
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// 項目値の更新用（タグ・画像・バリアントは専用の操作を使う）
    pub fn fields_mut(&mut self) -> &mut crate::fields::ProductFields {
        &mut self.state.fields
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn drafts(&self) -> &DraftStore<S> {
        &self.drafts
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// エディタの内容を取り込む
    pub fn sync_description(&mut self, editor: &dyn RichTextEditor) {
        self.state.fields.detailed_description = editor.markup();
        self.state.fields.detailed_text = editor.plain_text();
    }

    pub fn set_sku(&mut self, sku: String) {
        self.state.fields.sku = sku;
    }

    /// 動画URLの検証（項目から離れたとき）
    pub fn check_video_url(&self) -> Option<&'static str> {
        validate_video_url(&self.state.fields.video_url)
    }

    pub fn discount_percent(&self) -> u32 {
        preview::discount_percent(&self.state.fields.regular_price, &self.state.fields.sale_price)
    }

    // ---- タグ ----

    pub fn add_tag(&mut self, value: &str) -> bool {
        let result = self.state.tags.add(value);
        let capacity = format!("タグは最大{}個までです", self.config.max_tags);
        self.handle_added(result, "このタグは既に存在します", &capacity)
    }

    pub fn remove_tag(&mut self, index: usize) -> bool {
        let result = self.state.tags.remove(index).map(|_| ());
        self.handle_misuse(result)
    }

    // ---- バリアント ----

    pub fn add_variant(&mut self, name: &str) -> VariantId {
        self.state.variants.add_variant(name)
    }

    pub fn rename_variant(&mut self, id: VariantId, name: &str) -> bool {
        let result = self.state.variants.rename(id, name);
        self.handle_misuse(result)
    }

    pub fn remove_variant(&mut self, id: VariantId) -> bool {
        self.state.variants.remove_variant(id)
    }

    pub fn add_variant_value(&mut self, id: VariantId, value: &str) -> bool {
        let result = self.state.variants.add_value(id, value);
        self.handle_added(result, "この値は既に存在します", "これ以上追加できません")
    }

    pub fn remove_variant_value(&mut self, id: VariantId, index: usize) -> bool {
        let result = self.state.variants.remove_value(id, index).map(|_| ());
        self.handle_misuse(result)
    }

    // ---- 画像 ----

    /// ファイルをまとめて追加し、追加できた枚数を返す
    pub fn add_images(&mut self, files: Vec<ImagePayload>) -> usize {
        match self.state.images.add_many(files) {
            Ok(report) => {
                for _ in &report.rejected {
                    self.reject_non_image();
                }
                report.added
            }
            Err(e) => {
                self.notify_capacity(&e);
                0
            }
        }
    }

    /// 画像以外のファイルが選ばれた
    pub fn reject_non_image(&self) {
        self.notifier
            .notify("画像ファイルのみ選択してください", Severity::Error);
    }

    /// 非同期読み込みの開始前に枚数を確認する
    pub fn admit_images(&self, count: usize) -> bool {
        match self.state.images.admit_batch(count) {
            Ok(()) => true,
            Err(e) => {
                self.notify_capacity(&e);
                false
            }
        }
    }

    /// 非同期読み込みの完了
    pub fn image_loaded(&mut self, payload: Option<ImagePayload>, data_url: String) -> bool {
        match self.state.images.push_loaded(payload, data_url) {
            Ok(_) => true,
            Err(e) => {
                self.notify_capacity(&e);
                false
            }
        }
    }

    pub fn set_primary_image(&mut self, index: usize) -> bool {
        let result = self.state.images.set_primary(index);
        self.handle_misuse(result)
    }

    pub fn remove_image(&mut self, index: usize) -> bool {
        let result = self.state.images.remove(index).map(|_| ());
        self.handle_misuse(result)
    }

    pub fn reorder_images(&mut self, from: usize, to: usize) -> bool {
        let result = self.state.images.reorder(from, to);
        self.handle_misuse(result)
    }

    // ---- ステップ ----

    pub fn next_step(&mut self) -> Navigation {
        match self.wizard.advance(&self.state) {
            Advance::Moved(step) => {
                let preview = (step == Step::Preview).then(|| self.preview());
                Navigation::Moved { step, preview }
            }
            Advance::Blocked(result) => Navigation::Blocked(result),
            Advance::AtEnd => Navigation::Unchanged,
        }
    }

    pub fn prev_step(&mut self) -> Navigation {
        if self.wizard.retreat() {
            Navigation::Moved {
                step: self.wizard.current(),
                preview: None,
            }
        } else {
            Navigation::Unchanged
        }
    }

    pub fn preview(&self) -> PreviewModel {
        preview::build(&self.state, &self.config.catalog)
    }

    // ---- 下書き ----

    pub fn snapshot(&self) -> Draft {
        Draft {
            current_step: self.wizard.current().number(),
            fields: self.state.fields.clone(),
            tags: self.state.tags.serialize(),
            variants: self.state.variants.to_drafts(),
            next_variant_id: self.state.variants.next_id(),
            uploaded_images: self.state.images.to_drafts(),
        }
    }

    /// 明示的な下書き保存
    pub fn save_draft(&mut self) -> bool {
        let draft = self.snapshot();
        match self.drafts.save(&draft) {
            Ok(()) => {
                self.notifier.notify("下書きを保存しました", Severity::Success);
                true
            }
            Err(e) => {
                self.notifier
                    .notify(&format!("下書きを保存できませんでした: {}", e), Severity::Error);
                false
            }
        }
    }

    /// 自動保存（失敗は状態として返すだけ）
    pub fn autosave(&mut self) -> SaveStatus {
        if self.ended {
            return SaveStatus::Idle;
        }
        let draft = self.snapshot();
        self.drafts.autosave(&draft)
    }

    /// ページ離脱時に確認が必要か
    pub fn should_confirm_leave(&self) -> bool {
        !self.ended && self.drafts.exists()
    }

    // ---- 送信・キャンセル ----

    /// 全ステップを検証して送信
    ///
    /// 検証エラーの場合は最初のエラーのステップへ戻す。
    pub fn submit(
        &mut self,
        transport: &mut dyn SubmissionTransport,
    ) -> Result<NavigationIntent, SubmissionError> {
        let payload = match submission::assemble(&self.state, self.wizard.current()) {
            Ok(payload) => payload,
            Err(e) => {
                if let SubmissionError::Invalid { step, .. } = &e {
                    self.wizard.jump_to(*step);
                }
                self.notifier.notify("入力内容を修正してください", Severity::Error);
                return Err(e);
            }
        };

        if let Err(e) = transport.send(&payload) {
            self.notifier
                .notify(&format!("送信に失敗しました: {}", e), Severity::Error);
            return Err(SubmissionError::Transport(e.to_string()));
        }

        self.finish();
        self.notifier.notify("商品を登録しました", Severity::Success);
        Ok(NavigationIntent::ProductList)
    }

    /// 確認のうえ入力を破棄する（検証なし）
    pub fn cancel(&mut self, dialog: &mut dyn ConfirmDialog) -> Option<NavigationIntent> {
        let confirmed = dialog.confirm(
            "登録をキャンセル",
            "キャンセルしてよろしいですか？入力内容はすべて失われます。",
        );
        if !confirmed {
            return None;
        }
        self.finish();
        Some(NavigationIntent::ProductList)
    }

    fn finish(&mut self) {
        if let Err(e) = self.drafts.clear() {
            eprintln!("⚠ 下書きを削除できません: {}", e);
        }
        self.ended = true;
    }

    // ---- エラー処理 ----

    fn handle_added(
        &self,
        result: Result<bool, CollectionError>,
        duplicate_message: &str,
        capacity_message: &str,
    ) -> bool {
        match result {
            Ok(added) => added,
            Err(CollectionError::Duplicate(_)) => {
                self.notifier.notify(duplicate_message, Severity::Warning);
                false
            }
            Err(CollectionError::Capacity { .. }) => {
                self.notifier.notify(capacity_message, Severity::Warning);
                false
            }
            Err(e) => self.handle_misuse(Err(e)),
        }
    }

    fn notify_capacity(&self, error: &CollectionError) {
        let message = match error {
            CollectionError::Capacity { max } => format!("画像は最大{}枚までです", max),
            other => other.to_string(),
        };
        self.notifier.notify(&message, Severity::Warning);
    }

    /// 範囲外・存在しないID: 開発時は panic、リリースでは何もしない
    fn handle_misuse(&self, result: Result<(), CollectionError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                debug_assert!(!e.is_misuse(), "UI層からの不正な操作: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::MemorySlot;
    use crate::editor::MarkupEditor;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(String, Severity)>>>);

    impl Notifier for Recorder {
        fn notify(&self, message: &str, severity: Severity) {
            self.0.borrow_mut().push((message.to_string(), severity));
        }
    }

    impl Recorder {
        fn severities(&self) -> Vec<Severity> {
            self.0.borrow().iter().map(|(_, s)| *s).collect()
        }

        fn last(&self) -> Option<(String, Severity)> {
            self.0.borrow().last().cloned()
        }
    }

    struct Answer(bool);

    impl ConfirmDialog for Answer {
        fn confirm(&mut self, _title: &str, _message: &str) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: Vec<submission::SubmissionPayload>,
        fail: bool,
    }

    impl SubmissionTransport for Outbox {
        fn send(&mut self, payload: &submission::SubmissionPayload) -> crate::Result<()> {
            if self.fail {
                return Err(crate::Error::Storage("offline".into()));
            }
            self.sent.push(payload.clone());
            Ok(())
        }
    }

    fn png(name: &str) -> ImagePayload {
        ImagePayload {
            file_name: name.into(),
            mime_type: "image/png".into(),
            bytes: vec![7],
        }
    }

    fn session_with(slot: MemorySlot) -> (FormSession<MemorySlot, Recorder>, Recorder) {
        let recorder = Recorder::default();
        let mut editor = MarkupEditor::default();
        let session = FormSession::start(
            FormConfig::default(),
            slot,
            recorder.clone(),
            &mut editor,
            "PRD-TEST-00000".into(),
        );
        (session, recorder)
    }

    fn new_session() -> (FormSession<MemorySlot, Recorder>, Recorder) {
        session_with(MemorySlot::new())
    }

    fn fill_valid(session: &mut FormSession<MemorySlot, Recorder>) {
        let fields = session.fields_mut();
        fields.product_name = "ウールマフラー".into();
        fields.category_id = "fashion".into();
        fields.short_description = "肌ざわりの良いマフラー".into();
        fields.regular_price = "4800".into();
        fields.sale_price = "3600".into();
        fields.stock_quantity = "25".into();
        let editor = MarkupEditor::new("<p>メリノウール100%のマフラーです</p>");
        session.sync_description(&editor);
        session.add_images(vec![png("a.png")]);
    }

    #[test]
    fn test_start_without_draft() {
        let (session, recorder) = new_session();
        assert_eq!(session.state().fields.sku, "PRD-TEST-00000");
        assert_eq!(session.state().fields.currency, "JPY");
        assert_eq!(session.wizard().current(), Step::BasicInfo);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_duplicate_tag_scenario() {
        let (mut session, recorder) = new_session();
        assert!(session.add_tag("red"));
        assert!(session.add_tag("blue"));
        assert!(!session.add_tag("red"));
        assert_eq!(session.state().tags.serialize(), vec!["red", "blue"]);
        assert_eq!(
            recorder.last(),
            Some(("このタグは既に存在します".to_string(), Severity::Warning))
        );
    }

    #[test]
    fn test_tag_capacity_notification() {
        let (mut session, recorder) = new_session();
        for t in ["a", "b", "c", "d", "e"] {
            assert!(session.add_tag(t));
        }
        assert!(!session.add_tag("f"));
        assert_eq!(session.state().tags.len(), 5);
        assert_eq!(
            recorder.last(),
            Some(("タグは最大5個までです".to_string(), Severity::Warning))
        );
    }

    #[test]
    fn test_six_images_scenario() {
        let (mut session, recorder) = new_session();
        let mut accepted = 0;
        for i in 0..6 {
            accepted += session.add_images(vec![png(&format!("{}.png", i))]);
        }
        assert_eq!(accepted, 5);
        assert_eq!(session.state().images.primary_index(), Some(0));
        assert_eq!(recorder.severities(), vec![Severity::Warning]);
    }

    #[test]
    fn test_batch_of_six_rejected() {
        let (mut session, recorder) = new_session();
        let batch = (0..6).map(|i| png(&format!("{}.png", i))).collect();
        assert_eq!(session.add_images(batch), 0);
        assert!(session.state().images.is_empty());
        assert_eq!(recorder.severities(), vec![Severity::Warning]);
    }

    #[test]
    fn test_non_image_rejected_individually() {
        let (mut session, recorder) = new_session();
        let text = ImagePayload {
            file_name: "memo.txt".into(),
            mime_type: "text/plain".into(),
            bytes: vec![],
        };
        assert_eq!(session.add_images(vec![png("a.png"), text]), 1);
        assert_eq!(recorder.severities(), vec![Severity::Error]);
    }

    #[test]
    fn test_async_image_path() {
        let (mut session, _) = new_session();
        assert!(session.admit_images(2));
        // 読み込み中でもプレビューは完了済みの画像だけを見る
        assert_eq!(session.preview().gallery, preview::Gallery::Empty);
        assert!(session.image_loaded(None, "data:image/png;base64,AA==".into()));
        assert!(session.image_loaded(None, "data:image/png;base64,AQ==".into()));
        assert_eq!(session.state().images.primary_index(), Some(0));
        assert!(!session.admit_images(4));
    }

    #[test]
    fn test_next_step_blocked_keeps_step() {
        let (mut session, _) = new_session();
        let nav = session.next_step();
        assert!(matches!(nav, Navigation::Blocked(_)));
        assert_eq!(session.wizard().current(), Step::BasicInfo);
    }

    #[test]
    fn test_walk_to_preview() {
        let (mut session, _) = new_session();
        fill_valid(&mut session);
        for expected in [Step::Pricing, Step::Inventory, Step::Media] {
            assert_eq!(
                session.next_step(),
                Navigation::Moved { step: expected, preview: None }
            );
        }
        match session.next_step() {
            Navigation::Moved { step: Step::Preview, preview: Some(model) } => {
                assert_eq!(model.discount_percent, 25);
                assert_eq!(model.category, "ファッション");
            }
            other => panic!("プレビューに入らない: {:?}", other),
        }
        assert_eq!(session.next_step(), Navigation::Unchanged);
        assert!(session.wizard().buttons().submit);
    }

    #[test]
    fn test_prev_step() {
        let (mut session, _) = new_session();
        assert_eq!(session.prev_step(), Navigation::Unchanged);
        fill_valid(&mut session);
        session.next_step();
        assert_eq!(
            session.prev_step(),
            Navigation::Moved { step: Step::BasicInfo, preview: None }
        );
    }

    #[test]
    fn test_draft_roundtrip_through_session() {
        let (mut session, _) = new_session();
        fill_valid(&mut session);
        session.add_tag("冬物");
        let id = session.add_variant("");
        session.add_variant_value(id, "グレー");
        session.next_step();
        assert!(session.save_draft());

        let saved = session.drafts().slot().clone();
        let (restored, recorder) = session_with(saved);
        assert_eq!(restored.state().fields, session.state().fields);
        assert_eq!(restored.state().tags, session.state().tags);
        assert_eq!(restored.state().images.to_drafts(), session.state().images.to_drafts());
        assert_eq!(restored.state().variants.to_drafts(), session.state().variants.to_drafts());
        assert_eq!(restored.wizard().current(), Step::BasicInfo);
        assert!(!restored.wizard().is_completed(Step::BasicInfo));
        assert_eq!(
            recorder.last(),
            Some(("下書きを読み込みました".to_string(), Severity::Info))
        );
    }

    #[test]
    fn test_restore_keeps_new_sku_when_draft_has_none() {
        let slot = MemorySlot::with_value(r#"{"productName": "古い下書き", "currentStep": 9}"#);
        let (session, _) = session_with(slot);
        assert_eq!(session.state().fields.sku, "PRD-TEST-00000");
        assert_eq!(session.state().fields.product_name, "古い下書き");
        assert_eq!(session.wizard().current(), Step::BasicInfo);
    }

    #[test]
    fn test_out_of_range_variant_id_in_draft() {
        let slot = MemorySlot::with_value(
            r#"{"productName": "Tシャツ", "variants": [{"id": 18446744073709551615, "name": "色", "values": ["赤"]}]}"#,
        );
        let (mut session, _) = session_with(slot);
        assert_eq!(session.state().fields.product_name, "Tシャツ");
        assert!(session.state().variants.is_empty());
        let id = session.add_variant("サイズ");
        assert!(session.add_variant_value(id, "M"));
        assert_eq!(session.state().variants.len(), 1);
    }

    #[test]
    fn test_malformed_draft_is_ignored() {
        let (session, recorder) = session_with(MemorySlot::with_value("]]"));
        assert_eq!(session.state().fields.product_name, "");
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_save_draft_failure_is_reported() {
        let (mut session, recorder) = session_with(MemorySlot::with_limit(8));
        assert!(!session.save_draft());
        assert_eq!(recorder.severities(), vec![Severity::Error]);
        assert!(matches!(session.autosave(), SaveStatus::Failed(_)));
    }

    #[test]
    fn test_submit_invalid_jumps_back() {
        let (mut session, recorder) = new_session();
        fill_valid(&mut session);
        for _ in 0..4 {
            session.next_step();
        }
        session.fields_mut().regular_price = "abc".into();
        let mut outbox = Outbox::default();
        let err = session.submit(&mut outbox).unwrap_err();
        assert!(matches!(err, SubmissionError::Invalid { step: Step::Pricing, .. }));
        assert_eq!(session.wizard().current(), Step::Pricing);
        assert!(outbox.sent.is_empty());
        assert_eq!(recorder.last().map(|(_, s)| s), Some(Severity::Error));
        assert!(!session.is_ended());
    }

    #[test]
    fn test_submit_success_clears_draft() {
        let (mut session, recorder) = new_session();
        fill_valid(&mut session);
        session.save_draft();
        let mut outbox = Outbox::default();
        assert_eq!(session.submit(&mut outbox).unwrap(), NavigationIntent::ProductList);
        assert_eq!(outbox.sent.len(), 1);
        assert_eq!(outbox.sent[0].attachments.len(), 1);
        assert!(!session.drafts().exists());
        assert!(session.is_ended());
        assert_eq!(session.autosave(), SaveStatus::Idle);
        assert!(!session.drafts().exists());
        assert_eq!(recorder.last().map(|(_, s)| s), Some(Severity::Success));
    }

    #[test]
    fn test_submit_transport_failure_keeps_draft() {
        let (mut session, _) = new_session();
        fill_valid(&mut session);
        session.save_draft();
        let mut outbox = Outbox { fail: true, ..Default::default() };
        assert!(matches!(session.submit(&mut outbox), Err(SubmissionError::Transport(_))));
        assert!(session.drafts().exists());
        assert!(!session.is_ended());
    }

    #[test]
    fn test_cancel_requires_confirmation() {
        let (mut session, _) = new_session();
        session.save_draft();
        assert_eq!(session.cancel(&mut Answer(false)), None);
        assert!(session.should_confirm_leave());

        assert_eq!(session.cancel(&mut Answer(true)), Some(NavigationIntent::ProductList));
        assert!(!session.drafts().exists());
        assert!(!session.should_confirm_leave());
    }

    #[test]
    fn test_variant_operations() {
        let (mut session, recorder) = new_session();
        let id = session.add_variant("サイズ");
        assert!(session.add_variant_value(id, "M"));
        assert!(!session.add_variant_value(id, "M"));
        assert_eq!(
            recorder.last(),
            Some(("この値は既に存在します".to_string(), Severity::Warning))
        );
        assert!(session.rename_variant(id, "サイズ（cm）"));
        assert!(session.remove_variant_value(id, 0));
        assert!(session.remove_variant(id));
        assert!(!session.remove_variant(id));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "UI層からの不正な操作")]
    fn test_misuse_panics_in_debug() {
        let (mut session, _) = new_session();
        session.remove_tag(3);
    }

    #[test]
    fn test_video_url_check() {
        let (mut session, _) = new_session();
        session.fields_mut().video_url = "https://example.com/v".into();
        assert!(session.check_video_url().is_some());
        session.fields_mut().video_url = "https://vimeo.com/1".into();
        assert!(session.check_video_url().is_none());
    }
}
