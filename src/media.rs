//! 画像ファイルの読み込み
//!
//! パス指定またはフォルダ直下のスキャンで画像を集め、MIMEタイプを判定する。
//! 画像でないファイルもそのまま渡し、拒否はフォーム側で行う。

use crate::error::{Result, WizardError};
use image::ImageFormat;
use product_wizard_common::ImagePayload;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// MIMEタイプの判定（拡張子 → 内容の順）
pub fn detect_mime(path: &Path, bytes: &[u8]) -> String {
    ImageFormat::from_path(path)
        .ok()
        .or_else(|| image::guess_format(bytes).ok())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

pub fn load_file(path: &Path) -> Result<ImagePayload> {
    if !path.is_file() {
        return Err(WizardError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)
        .map_err(|e| WizardError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(ImagePayload {
        file_name,
        mime_type: detect_mime(path, &bytes),
        bytes,
    })
}

/// フォルダ直下のファイルを名前順に列挙
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(WizardError::FolderNotFound(folder.display().to_string()));
    }

    let files = WalkDir::new(folder)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    Ok(files)
}

/// パスの一覧を読み込む（フォルダは直下を展開）
pub fn load_paths(paths: &[PathBuf]) -> Result<Vec<ImagePayload>> {
    let mut payloads = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in scan_folder(path)? {
                payloads.push(load_file(&file)?);
            }
        } else {
            payloads.push(load_file(path)?);
        }
    }
    Ok(payloads)
}
