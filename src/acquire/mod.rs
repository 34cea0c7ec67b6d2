//! 画像取得
//!
//! カメラ撮影とライブラリ選択を `SourceKind` で切り替える。
//! `Ok(None)` はユーザーによるキャンセル（呼び出し側は何もしない）。

pub mod camera;
pub mod library;

pub use camera::CameraCapture;
pub use library::{scan_folder, validate_image, ImageInfo, LibraryPicker};

use crate::config::Config;
use crate::error::{Result, TextDetectorError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use text_detector_common::{ImageRef, SourceKind};

/// 取得元ごとの外部機能（カメラ / ライブラリ）
#[async_trait]
pub trait Capability: Send + Sync {
    async fn pick(&self) -> Result<Option<ImageRef>>;
}

/// 取得元を指定して画像を得る
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn acquire(&self, kind: SourceKind) -> Result<Option<ImageRef>>;
}

pub struct Acquirer<C, L> {
    camera: C,
    library: L,
}

impl<C: Capability, L: Capability> Acquirer<C, L> {
    pub fn new(camera: C, library: L) -> Self {
        Self { camera, library }
    }
}

#[async_trait]
impl<C: Capability, L: Capability> ImageSource for Acquirer<C, L> {
    async fn acquire(&self, kind: SourceKind) -> Result<Option<ImageRef>> {
        tracing::info!(source = %kind, "画像取得開始");
        let result = match kind {
            SourceKind::Capture => self.camera.pick().await,
            SourceKind::Library => self.library.pick().await,
        };

        match &result {
            Ok(Some(image)) => tracing::info!(%image, "画像取得完了"),
            Ok(None) => tracing::info!(source = %kind, "画像取得キャンセル"),
            Err(e) => tracing::warn!(source = %kind, error = %e, "画像取得失敗"),
        }
        result
    }
}

/// 設定から取得元を組み立てる。`path` 指定時はライブラリの対話選択を省略
pub fn from_config(
    config: &Config,
    path: Option<PathBuf>,
    folder: Option<PathBuf>,
) -> Acquirer<CameraCapture, LibraryPicker> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let camera = CameraCapture::new(config.capture_command.clone(), config.capture_dir(), timeout);
    let library = LibraryPicker::new(folder.unwrap_or_else(|| config.library_dir()), path);
    Acquirer::new(camera, library)
}

/// コマンドライン引数（パスまたは file:// URI）を画像参照にする
pub fn resolve_image(arg: &str) -> Result<ImageRef> {
    if arg.trim_start().starts_with("file://") {
        return Ok(ImageRef::parse(arg)?);
    }

    let path = std::path::Path::new(arg);
    if !path.exists() {
        return Err(TextDetectorError::FileNotFound(arg.to_string()));
    }
    Ok(ImageRef::from_path(&std::fs::canonicalize(path)?)?)
}
