//! 送信テスト
//!
//! ディレクトリ出力の送信と、送信後の下書き削除を検証

use product_wizard::storage::FileSlot;
use product_wizard::transport::DirectoryTransport;
use product_wizard_common::interaction::SilentNotifier;
use product_wizard_common::{
    FormConfig, FormSession, ImagePayload, MarkupEditor, NavigationIntent, Step, SubmissionError,
    SubmissionTransport,
};
use std::path::Path;
use tempfile::tempdir;

fn ready_session(draft: &Path) -> FormSession<FileSlot, SilentNotifier> {
    let mut editor = MarkupEditor::default();
    let mut session = FormSession::start(
        FormConfig::default(),
        FileSlot::new(draft),
        SilentNotifier,
        &mut editor,
        "PRD-SEND-00002".into(),
    );
    {
        let f = session.fields_mut();
        f.product_name = "ワイヤレスイヤホン".into();
        f.category_id = "electronics".into();
        f.short_description = "ノイズキャンセリング搭載".into();
        f.regular_price = "12800".into();
        f.sale_price = "9800".into();
        f.stock_quantity = "30".into();
        f.offers = vec!["送料無料".into()];
    }
    session.sync_description(&MarkupEditor::new("<p>最大30時間再生のイヤホンです</p>"));
    session.add_tag("オーディオ");
    session.add_images(vec![ImagePayload {
        file_name: "front.jpg".into(),
        mime_type: "image/jpeg".into(),
        bytes: vec![0xff, 0xd8, 0xff],
    }]);
    session
}

/// 送信データがディレクトリに書き出される
#[test]
fn test_submit_writes_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let draft = dir.path().join("draft.json");
    let mut session = ready_session(&draft);
    session.save_draft();
    assert!(draft.exists());

    let mut transport = DirectoryTransport::new(dir.path().join("out"));
    let intent = session.submit(&mut transport).expect("送信失敗");
    assert_eq!(intent, NavigationIntent::ProductList);

    let out = transport.last_output().expect("出力先がない").to_path_buf();
    assert!(out.file_name().unwrap().to_string_lossy().ends_with("PRD-SEND-00002"));

    let fields: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("fields.json")).unwrap()).unwrap();
    assert_eq!(fields["productName"], "ワイヤレスイヤホン");
    assert_eq!(fields["salePrice"], "9800");
    assert_eq!(fields["tags"], r#"["オーディオ"]"#);
    assert_eq!(fields["primaryImageIndex"], "0");

    let attachments: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("attachments.json")).unwrap())
            .unwrap();
    assert_eq!(attachments[0]["field"], "images[]");
    assert_eq!(attachments[0]["fileName"], "front.jpg");
    let stored = attachments[0]["storedAs"].as_str().unwrap();
    assert_eq!(std::fs::read(out.join("images").join(stored)).unwrap(), vec![0xff, 0xd8, 0xff]);

    // 送信後は下書きが消え、自動保存も止まる
    assert!(!draft.exists());
    assert!(session.is_ended());
    session.autosave();
    assert!(!draft.exists());
}

/// 検証エラーでは何も書き出さない
#[test]
fn test_invalid_submission_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = ready_session(&dir.path().join("draft.json"));
    session.fields_mut().stock_quantity = "2.5".into();

    let out = dir.path().join("out");
    let mut transport = DirectoryTransport::new(&out);
    let err = session.submit(&mut transport).unwrap_err();
    assert!(matches!(err, SubmissionError::Invalid { step: Step::Inventory, .. }));
    assert_eq!(session.wizard().current(), Step::Inventory);
    assert!(!out.exists());
}

/// 出力先を作れない場合は送信失敗として下書きを残す
#[test]
fn test_transport_failure_keeps_draft() {
    let dir = tempdir().expect("Failed to create temp dir");
    let draft = dir.path().join("draft.json");
    let mut session = ready_session(&draft);
    session.save_draft();

    // ファイルの下にはディレクトリを作れない
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file").unwrap();
    let mut transport = DirectoryTransport::new(&blocker);
    let err = session.submit(&mut transport).unwrap_err();
    assert!(matches!(err, SubmissionError::Transport(_)));
    assert!(draft.exists());
    assert!(!session.is_ended());
}

/// 同じ送信を直接渡しても出力できる
#[test]
fn test_transport_send_directly() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = ready_session(&dir.path().join("draft.json"));
    let payload = product_wizard_common::submission::assemble(session.state(), Step::Preview)
        .expect("組み立て失敗");

    let mut transport = DirectoryTransport::new(dir.path());
    transport.send(&payload).expect("出力失敗");
    assert!(transport.last_output().unwrap().join("fields.json").exists());
}
