//! 画像参照・取得元・認識結果の型定義
//!
//! CLIとデスクトップで共有される型:
//! - ImageRef: 取得した画像の場所（file:// URI）
//! - SourceKind: 取得元（カメラ撮影 / ライブラリ選択）
//! - TextBlock: 文字認識エンジンの出力1件

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// 取得した画像の参照（ローカルファイルの file:// URI）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef(Url);

impl ImageRef {
    /// 絶対パスから URI を作る（ファイルシステムには触れない）。相対パスは拒否
    pub fn from_path(path: &Path) -> Result<Self> {
        Url::from_file_path(path)
            .map(Self)
            .map_err(|()| Error::InvalidImageRef(format!("絶対パスではありません: {}", path.display())))
    }

    /// `file://` URI または絶対パス文字列を解釈
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidImageRef("空の参照".into()));
        }
        if !s.contains("://") {
            return Self::from_path(Path::new(s));
        }

        let url = Url::parse(s).map_err(|e| Error::InvalidImageRef(format!("{s}: {e}")))?;
        if url.scheme() != "file" {
            return Err(Error::InvalidImageRef(s.to_string()));
        }

        // ホスト付き（file://server/...）やファイル名のないURIはローカル画像にならない
        match url.to_file_path() {
            Ok(path) if path.file_name().is_some() => Ok(Self(url)),
            _ => Err(Error::InvalidImageRef(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// ローカルパスに戻す
    pub fn to_path(&self) -> PathBuf {
        // 生成時に変換できることを確認済み
        self.0
            .to_file_path()
            .unwrap_or_else(|()| PathBuf::from(self.0.path()))
    }

    pub fn file_name(&self) -> String {
        self.to_path()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ImageRef {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        image.0.into()
    }
}

/// 画像の取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// カメラで撮影
    Capture,
    /// フォトライブラリから選択
    Library,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Capture => "capture",
            SourceKind::Library => "library",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "capture" | "camera" => Ok(SourceKind::Capture),
            "library" | "gallery" => Ok(SourceKind::Library),
            _ => Err(format!("Unknown source: {}. Use capture or library", s)),
        }
    }
}

/// 文字認識エンジンが返すブロック（先頭の text のみ使用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBlock {
    pub text: String,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 先頭ブロックのテキスト。ブロックなし・空白のみは None
pub fn first_text(blocks: &[TextBlock]) -> Option<&str> {
    blocks
        .first()
        .map(|b| b.text.as_str())
        .filter(|t| !t.trim().is_empty())
}

/// 改行で行に分割（順序維持、空行も残す）
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
