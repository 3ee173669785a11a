//! エラーケーステスト
//!
//! 画像読み込み・設定・送信の各種エラー条件を検証

use product_wizard::error::WizardError;
use product_wizard::media;
use product_wizard_common::{CollectionError, SubmissionError};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = media::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(WizardError::FolderNotFound(_))));
}

/// 存在しないファイルを読み込んだ場合
#[test]
fn test_load_missing_file() {
    let result = media::load_paths(&[PathBuf::from("/nonexistent/photo.png")]);
    assert!(matches!(result, Err(WizardError::FileNotFound(_))));
}

/// フォルダ直下のファイルを名前順で読み込む（画像以外も含む）
#[test]
fn test_load_folder_sorted() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("b.png"), [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]).unwrap();
    std::fs::write(dir.path().join("a.jpg"), [0xff, 0xd8, 0xff, 0xe0]).unwrap();
    std::fs::write(dir.path().join("c.txt"), "memo").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("d.png"), "x").unwrap();

    let files = media::load_paths(&[dir.path().to_path_buf()]).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "b.png", "c.txt"]);
    assert_eq!(files[0].mime_type, "image/jpeg");
    assert_eq!(files[1].mime_type, "image/png");
    assert!(!files[2].is_image());
}

/// 拡張子がなくても内容から判定する
#[test]
fn test_detect_mime_from_content() {
    let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    assert_eq!(media::detect_mime(Path::new("noext"), &png), "image/png");
    assert_eq!(media::detect_mime(Path::new("noext"), b"hello"), "application/octet-stream");
}

/// WizardErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        WizardError::Config("テスト設定エラー".to_string()),
        WizardError::FileNotFound("test.jpg".to_string()),
        WizardError::FolderNotFound("/path/to/folder".to_string()),
        WizardError::ImageLoad("読み込み失敗".to_string()),
        WizardError::NoDraft("draft.json".to_string()),
        WizardError::SessionLock,
        WizardError::Form(CollectionError::Capacity { max: 5 }.into()),
        WizardError::Submission(SubmissionError::Transport("offline".to_string())),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: WizardError = io_err.into();
    assert!(matches!(err, WizardError::Io(_)));
}

/// JSONパースエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: WizardError = json_err.into();
    assert!(matches!(err, WizardError::JsonParse(_)));
}
