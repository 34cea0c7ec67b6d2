//! tesseract 連携（rusty-tesseract 経由）
//!
//! 画像を読み込んで `image_to_string` に渡し、テキスト全体を1ブロックとして返す。
//! tesseract 本体は PATH 上のものを使う。

use super::TextRecognizer;
use crate::config::Config;
use crate::error::{Result, TextDetectorError};
use async_trait::async_trait;
use rusty_tesseract::{Args, Image, TessError};
use std::path::Path;
use std::time::Duration;
use text_detector_common::{ImageRef, TextBlock};

#[derive(Debug, Clone)]
pub struct Tesseract {
    language: String,
    psm: u8,
    timeout: Duration,
}

impl Tesseract {
    pub fn new(language: impl Into<String>, psm: u8, timeout: Duration) -> Self {
        Self {
            language: language.into(),
            psm,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.language(),
            config.psm,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn args(&self) -> Args {
        Args {
            lang: self.language.clone(),
            psm: Some(i32::from(self.psm)),
            ..Args::default()
        }
    }
}

/// 標準出力をブロックに変換。末尾の改行・改ページは除く
pub fn parse_output(stdout: &str) -> Vec<TextBlock> {
    let text = stdout
        .trim_start_matches(['\n', '\r'])
        .trim_end_matches(|c: char| c == '\u{000C}' || c.is_whitespace());

    if text.is_empty() {
        Vec::new()
    } else {
        vec![TextBlock::new(text)]
    }
}

fn recognition_error(err: TessError) -> TextDetectorError {
    match err {
        TessError::TesseractNotFoundError => TextDetectorError::RecognitionFailed(
            "tesseract が見つかりません。インストールして PATH に追加してください".into(),
        ),
        other => TextDetectorError::RecognitionFailed(other.to_string()),
    }
}

/// ブロッキング処理。tif など拡張子で弾かれる形式もあるので image で読み込んでから渡す
fn run_tesseract(path: &Path, args: &Args) -> Result<String> {
    let decoded = image::open(path).map_err(|e| {
        TextDetectorError::RecognitionFailed(format!("画像を読み込めません ({}): {}", path.display(), e))
    })?;
    let image = Image::from_dynamic_image(&decoded).map_err(recognition_error)?;
    rusty_tesseract::image_to_string(&image, args).map_err(recognition_error)
}

#[async_trait]
impl TextRecognizer for Tesseract {
    async fn detect_from_uri(&self, image: &ImageRef) -> Result<Vec<TextBlock>> {
        let path = image.to_path();
        if !path.exists() {
            return Err(TextDetectorError::FileNotFound(path.display().to_string()));
        }

        tracing::info!(%image, language = %self.language, psm = self.psm, "文字認識開始");
        let args = self.args();
        let task = tokio::task::spawn_blocking(move || run_tesseract(&path, &args));

        // 時間切れでも実行中の tesseract は止められないので、結果を待たずに戻る
        let text = tokio::time::timeout(self.timeout, task)
            .await
            .map_err(|_| TextDetectorError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| TextDetectorError::CliExecution(format!("文字認識タスクエラー: {}", e)))??;

        let blocks = parse_output(&text);
        tracing::info!(
            %image,
            lines = blocks.first().map(|b| b.text.lines().count()).unwrap_or(0),
            "文字認識完了"
        );
        Ok(blocks)
    }
}
