use crate::error::{Result, WizardError};
use product_wizard_common::FormConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// フォームの上限値・選択肢
    pub form: FormConfig,
    /// 下書きファイル（省略時は ~/.config/product-wizard/<storageKey>.json）
    pub draft_path: Option<PathBuf>,
    /// 送信データの出力先
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            form: FormConfig::default(),
            draft_path: None,
            output_dir: PathBuf::from("submissions"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WizardError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("product-wizard"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 下書きファイルのパス
    pub fn draft_path(&self) -> Result<PathBuf> {
        match &self.draft_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(format!("{}.json", self.form.storage_key))),
        }
    }
}
