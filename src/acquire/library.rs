//! フォトライブラリからの選択
//!
//! フォルダ直下の画像を一覧し、対話的に1枚選ぶ（Escでキャンセル）。
//! パスが直接指定された場合はその画像を検証して返す。

use super::Capability;
use crate::error::{Result, TextDetectorError};
use async_trait::async_trait;
use dialoguer::Select;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use text_detector_common::ImageRef;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub date: Option<String>,
}

impl ImageInfo {
    fn label(&self) -> String {
        match &self.date {
            Some(date) => format!("{}  ({})", self.file_name, date),
            None => self.file_name.clone(),
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(TextDetectorError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1) // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(|e| ImageInfo {
            path: e.path().to_path_buf(),
            file_name: e.file_name().to_string_lossy().to_string(),
            date: capture_date(e.path()),
        })
        .collect();

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(images)
}

/// EXIFの撮影日時（DateTimeOriginal → DateTime）
fn capture_date(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let exif = exif::Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()?;

    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .into_iter()
        .find_map(|tag| exif.get_field(tag, exif::In::PRIMARY))
        .map(|field| field.display_value().to_string())
}

/// 静止画として読めるファイルか確認し、絶対パスを返す
pub fn validate_image(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(TextDetectorError::FileNotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(TextDetectorError::NotAnImage(path.display().to_string()));
    }

    // 拡張子ではなく先頭バイトで判定
    let mut header = [0u8; 32];
    let read = File::open(path)
        .and_then(|mut f| f.read(&mut header))
        .map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => {
                TextDetectorError::PermissionDenied(path.display().to_string())
            }
            _ => TextDetectorError::Io(e),
        })?;

    if image::guess_format(&header[..read]).is_err() {
        return Err(TextDetectorError::NotAnImage(path.display().to_string()));
    }

    Ok(std::fs::canonicalize(path)?)
}

pub struct LibraryPicker {
    folder: PathBuf,
    path: Option<PathBuf>,
}

impl LibraryPicker {
    pub fn new(folder: PathBuf, path: Option<PathBuf>) -> Self {
        Self { folder, path }
    }
}

#[async_trait]
impl Capability for LibraryPicker {
    async fn pick(&self) -> Result<Option<ImageRef>> {
        if let Some(path) = &self.path {
            let absolute = validate_image(path)?;
            return Ok(Some(ImageRef::from_path(&absolute)?));
        }

        let images = scan_folder(&self.folder)?;
        if images.is_empty() {
            return Err(TextDetectorError::NoImagesFound(self.folder.display().to_string()));
        }

        let labels: Vec<String> = images.iter().map(ImageInfo::label).collect();
        let prompt = format!("写真を選択 ({})", self.folder.display());
        let selection = tokio::task::spawn_blocking(move || {
            Select::new()
                .with_prompt(prompt)
                .items(&labels)
                .default(0)
                .interact_opt()
        })
        .await
        .map_err(|e| TextDetectorError::CliExecution(format!("選択処理エラー: {}", e)))??;

        let Some(index) = selection else {
            return Ok(None);
        };
        let absolute = validate_image(&images[index].path)?;
        Ok(Some(ImageRef::from_path(&absolute)?))
    }
}
