//! 送信データのディレクトリ出力
//!
//! サーバーの代わりに、1回の送信を1つのディレクトリへ書き出す。
//! `fields.json` に文字列項目、`images/` に添付ファイル（`images[]` の順）。

use product_wizard_common::submission::IMAGE_ATTACHMENT_NAME;
use product_wizard_common::{Error, Result, SubmissionPayload, SubmissionTransport};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 添付ファイルの記録
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentEntry<'a> {
    field: &'static str,
    index: usize,
    file_name: &'a str,
    mime_type: &'a str,
    size: usize,
    stored_as: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryTransport {
    root: PathBuf,
    /// 直近の送信先
    last: Option<PathBuf>,
}

impl DirectoryTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last: None,
        }
    }

    pub fn last_output(&self) -> Option<&Path> {
        self.last.as_deref()
    }

    fn target_dir(&self, payload: &SubmissionPayload) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let name = match payload.field("sku").filter(|s| !s.is_empty()) {
            Some(sku) => format!("{}-{}", stamp, sanitize(sku)),
            None => stamp.to_string(),
        };
        self.root.join(name)
    }
}

/// ファイル名に使えない文字を置き換える
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}

/// 送信内容を1つのディレクトリへ書き込む
fn write_submission(dir: &Path, payload: &SubmissionPayload) -> Result<()> {
    let images_dir = dir.join("images");
    std::fs::create_dir_all(&images_dir)?;

    let mut entries = Vec::with_capacity(payload.attachments.len());
    for (index, file) in payload.attachments.iter().enumerate() {
        let stored_as = format!("{:02}_{}", index, sanitize(&file.file_name));
        std::fs::write(images_dir.join(&stored_as), &file.bytes)?;
        entries.push(AttachmentEntry {
            field: IMAGE_ATTACHMENT_NAME,
            index,
            file_name: &file.file_name,
            mime_type: &file.mime_type,
            size: file.bytes.len(),
            stored_as,
        });
    }

    let fields = serde_json::to_string_pretty(&payload.fields_json())?;
    std::fs::write(dir.join("fields.json"), fields)?;
    let attachments = serde_json::to_string_pretty(&entries)?;
    std::fs::write(dir.join("attachments.json"), attachments)?;
    Ok(())
}

/// 作業用ディレクトリへ書き込む。失敗したら作業用ディレクトリごと消す
fn stage(staging: &Path, payload: &SubmissionPayload) -> Result<()> {
    if staging.exists() {
        std::fs::remove_dir_all(staging)?;
    }
    let result = write_submission(staging, payload);
    if result.is_err() {
        let _ = std::fs::remove_dir_all(staging);
    }
    result
}

fn staging_path(dir: &Path) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.with_file_name(format!(".{}.partial", name))
}

impl SubmissionTransport for DirectoryTransport {
    /// 作業用ディレクトリに書き終えてから出力先へ名前を変える
    fn send(&mut self, payload: &SubmissionPayload) -> Result<()> {
        let dir = self.target_dir(payload);
        if dir.exists() {
            return Err(Error::Transport(format!("出力先が既に存在します: {}", dir.display())));
        }
        let staging = staging_path(&dir);
        stage(&staging, payload)?;
        if let Err(e) = std::fs::rename(&staging, &dir) {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(Error::Transport(format!("{}: {}", dir.display(), e)));
        }

        self.last = Some(dir);
        Ok(())
    }
}
