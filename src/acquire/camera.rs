//! カメラ撮影
//!
//! 設定された撮影コマンド（既定: fswebcam）を実行し、保存された静止画を返す。
//! コマンドが画像を残さずに終了した場合はキャンセル扱い。

use super::Capability;
use crate::config::OUTPUT_PLACEHOLDER;
use crate::error::{Result, TextDetectorError};
use crate::process;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use text_detector_common::ImageRef;

pub struct CameraCapture {
    command: Vec<String>,
    output_dir: PathBuf,
    timeout: Duration,
}

/// 撮影コマンドの終了状態の分類
#[derive(Debug, PartialEq, Eq)]
enum ExitKind {
    Saved,
    Cancelled,
    PermissionDenied(String),
    Failed(String),
}

impl CameraCapture {
    pub fn new(command: Vec<String>, output_dir: PathBuf, timeout: Duration) -> Self {
        Self { command, output_dir, timeout }
    }

    fn output_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f");
        self.output_dir.join(format!("capture-{}.jpg", stamp))
    }
}

/// `{output}` を保存先に置き換えた引数列（先頭はプログラム名）
fn build_args(template: &[String], output: &Path) -> Vec<String> {
    let output = output.display().to_string();
    template
        .iter()
        .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
        .collect()
}

fn classify_exit(output: &Output) -> ExitKind {
    if output.status.success() {
        return ExitKind::Saved;
    }

    let stderr = process::stderr_text(output);
    let lower = stderr.to_lowercase();
    if lower.contains("permission denied") || lower.contains("not permitted") {
        return ExitKind::PermissionDenied(stderr);
    }

    match output.status.code() {
        // Ctrl-C またはシグナル終了
        Some(130) | None => ExitKind::Cancelled,
        Some(code) => ExitKind::Failed(format!("exit code {}: {}", code, stderr)),
    }
}

fn has_image(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}

#[async_trait]
impl Capability for CameraCapture {
    async fn pick(&self) -> Result<Option<ImageRef>> {
        let Some(program) = self.command.first() else {
            return Err(TextDetectorError::Config("撮影コマンドが設定されていません".into()));
        };

        std::fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_path();
        let args = build_args(&self.command[1..], &output_path);

        let output = process::run(program, &args, self.timeout)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    TextDetectorError::CaptureUnavailable(format!("{} が見つかりません", program))
                }
                io::ErrorKind::PermissionDenied => TextDetectorError::PermissionDenied(e.to_string()),
                io::ErrorKind::TimedOut => TextDetectorError::Timeout(self.timeout.as_secs()),
                _ => TextDetectorError::CliExecution(format!("{}: {}", program, e)),
            })?;

        match classify_exit(&output) {
            ExitKind::Saved if has_image(&output_path) => {
                let absolute = std::fs::canonicalize(&output_path)?;
                Ok(Some(ImageRef::from_path(&absolute)?))
            }
            ExitKind::Saved | ExitKind::Cancelled => Ok(None),
            ExitKind::PermissionDenied(msg) => Err(TextDetectorError::PermissionDenied(msg)),
            ExitKind::Failed(msg) => Err(TextDetectorError::CaptureUnavailable(msg)),
        }
    }
}
