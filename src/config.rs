use crate::error::{Result, TextDetectorError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use text_detector_common::EmptyTextPolicy;

/// 撮影コマンド中でこの文字列が保存先パスに置き換わる
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub psm: u8,
    pub capture_command: Vec<String>,
    pub capture_dir: Option<PathBuf>,
    pub library_dir: Option<PathBuf>,
    pub timeout_seconds: u64,
    pub empty_text: EmptyTextPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TextDetectorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("text-detector").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            language: "eng".into(),
            psm: 3, // 自動ページ分割
            capture_command: ["fswebcam", "--no-banner", "-r", "1280x720", OUTPUT_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            capture_dir: None,
            library_dir: None,
            timeout_seconds: 60,
            empty_text: EmptyTextPolicy::Preserve,
        }
    }

    /// 環境変数を優先
    pub fn language(&self) -> String {
        std::env::var("TEXT_DETECTOR_LANG").unwrap_or_else(|_| self.language.clone())
    }

    /// 撮影画像の保存先
    pub fn capture_dir(&self) -> PathBuf {
        self.capture_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .map(|p| p.join("text-detector"))
                .unwrap_or_else(|| std::env::temp_dir().join("text-detector"))
        })
    }

    /// ライブラリとして一覧表示するフォルダ
    pub fn library_dir(&self) -> PathBuf {
        self.library_dir
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn set_language(&mut self, language: String) -> Result<()> {
        self.language = language;
        self.save()
    }

    pub fn set_psm(&mut self, psm: u8) -> Result<()> {
        if psm > 13 {
            return Err(TextDetectorError::Config(format!(
                "psmは0〜13で指定してください: {}",
                psm
            )));
        }
        self.psm = psm;
        self.save()
    }

    pub fn set_empty_text(&mut self, policy: EmptyTextPolicy) -> Result<()> {
        self.empty_text = policy;
        self.save()
    }
}
