//! 商品画像の管理
//!
//! 順序付きの画像リスト。メイン画像は常に最大1枚で、このモジュールだけが切り替える。

use crate::error::CollectionError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// 新規追加された画像のファイル本体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// data URI に変換
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// base64 の data URI から復元（ブラウザの FileReader の結果用）
    pub fn from_data_url(file_name: &str, data_url: &str) -> Option<Self> {
        let rest = data_url.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        let bytes = STANDARD.decode(data).ok()?;
        Some(Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        })
    }
}

/// 画像1枚分のレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// 下書きから復元した画像には存在しない
    payload: Option<ImagePayload>,
    data_url: String,
    is_primary: bool,
}

impl ImageRecord {
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn payload(&self) -> Option<&ImagePayload> {
        self.payload.as_ref()
    }
}

/// 下書きに保存される画像メタデータ（ファイル本体は含まない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDraft {
    pub data_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// `add_many` の結果
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub added: usize,
    /// 個別に拒否されたファイル
    pub rejected: Vec<CollectionError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    records: Vec<ImageRecord>,
    max: usize,
}

impl ImageSet {
    pub fn new(max: usize) -> Self {
        Self {
            records: Vec::new(),
            max,
        }
    }

    /// 複数ファイルを追加
    ///
    /// 合計が上限を超える場合はバッチ全体を拒否する。
    /// 画像以外のファイルは個別に拒否し、残りの画像は追加する。
    pub fn add_many(&mut self, files: Vec<ImagePayload>) -> Result<BatchReport, CollectionError> {
        self.admit_batch(files.len())?;

        let mut report = BatchReport::default();
        for file in files {
            if !file.is_image() {
                report.rejected.push(CollectionError::InvalidType(file.file_name));
                continue;
            }
            let data_url = file.to_data_url();
            match self.push_loaded(Some(file), data_url) {
                Ok(_) => report.added += 1,
                Err(e) => report.rejected.push(e),
            }
        }
        Ok(report)
    }

    /// バッチ受け入れ可否（容量のみ）
    ///
    /// 非同期読み込みの前に呼ぶ。読み込み完了後は `push_loaded` で追加する。
    pub fn admit_batch(&self, incoming: usize) -> Result<(), CollectionError> {
        if self.records.len() + incoming > self.max {
            return Err(CollectionError::Capacity { max: self.max });
        }
        Ok(())
    }

    /// 読み込みが完了した画像を末尾に追加し、その位置を返す
    ///
    /// 読み込みが並行していても上限を超えないよう、ここでも容量を確認する。
    pub fn push_loaded(
        &mut self,
        payload: Option<ImagePayload>,
        data_url: String,
    ) -> Result<usize, CollectionError> {
        if self.records.len() >= self.max {
            return Err(CollectionError::Capacity { max: self.max });
        }
        let is_primary = self.records.is_empty();
        self.records.push(ImageRecord {
            payload,
            data_url,
            is_primary,
        });
        Ok(self.records.len() - 1)
    }

    /// メイン画像を設定
    pub fn set_primary(&mut self, index: usize) -> Result<(), CollectionError> {
        self.check_index(index)?;
        for (i, record) in self.records.iter_mut().enumerate() {
            record.is_primary = i == index;
        }
        Ok(())
    }

    /// 画像を削除
    ///
    /// メイン画像を削除した場合、残りの先頭がメインになる。
    pub fn remove(&mut self, index: usize) -> Result<ImageRecord, CollectionError> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        if removed.is_primary {
            if let Some(first) = self.records.first_mut() {
                first.is_primary = true;
            }
        }
        Ok(removed)
    }

    /// 並べ替え（from の画像を to の位置へ移動）
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CollectionError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let record = self.records.remove(from);
        self.records.insert(to, record);
        Ok(())
    }

    pub fn primary_index(&self) -> Option<usize> {
        self.records.iter().position(|r| r.is_primary)
    }

    /// 表示用のメイン画像（メイン指定がなければ先頭）
    pub fn display_primary(&self) -> Option<&ImageRecord> {
        self.records
            .iter()
            .find(|r| r.is_primary)
            .or_else(|| self.records.first())
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// 下書き用メタデータ
    pub fn to_drafts(&self) -> Vec<ImageDraft> {
        self.records
            .iter()
            .map(|r| ImageDraft {
                data_url: r.data_url.clone(),
                is_primary: r.is_primary,
            })
            .collect()
    }

    /// 下書きから復元
    ///
    /// 上限を超える分は切り捨てる。メイン指定は最初の1枚だけを残し、
    /// 指定がなければ先頭をメインにする。
    pub fn from_drafts(drafts: Vec<ImageDraft>, max: usize) -> Self {
        let mut records: Vec<ImageRecord> = drafts
            .into_iter()
            .filter(|d| !d.data_url.is_empty())
            .take(max)
            .map(|d| ImageRecord {
                payload: None,
                data_url: d.data_url,
                is_primary: d.is_primary,
            })
            .collect();

        let primary = records.iter().position(|r| r.is_primary).unwrap_or(0);
        for (i, record) in records.iter_mut().enumerate() {
            record.is_primary = i == primary;
        }
        Self { records, max }
    }

    fn check_index(&self, index: usize) -> Result<(), CollectionError> {
        if index >= self.records.len() {
            return Err(CollectionError::OutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}
