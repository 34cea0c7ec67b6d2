//! CLIの `--json` 出力（デスクトップアプリが読み取る）

use crate::screen::{Failure, Screen};
use crate::types::{ImageRef, TextBlock};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AcquireStatus {
    Ok,
    Cancelled,
    PermissionDenied,
    Unavailable,
}

/// 画像取得の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireReport {
    pub status: AcquireStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AcquireReport {
    pub fn ok(image: ImageRef) -> Self {
        Self { status: AcquireStatus::Ok, image: Some(image), message: None }
    }

    pub fn cancelled() -> Self {
        Self { status: AcquireStatus::Cancelled, image: None, message: None }
    }

    pub fn failed(failure: &Failure) -> Self {
        let (status, message) = match failure {
            Failure::PermissionDenied(msg) => (AcquireStatus::PermissionDenied, msg),
            Failure::CaptureUnavailable(msg) | Failure::RecognitionFailed(msg) => {
                (AcquireStatus::Unavailable, msg)
            }
        };
        Self { status, image: None, message: Some(message.clone()) }
    }

    /// `Ok(None)` はキャンセル
    pub fn into_outcome(self) -> Result<Option<ImageRef>, Failure> {
        let message = self.message.unwrap_or_default();
        match self.status {
            AcquireStatus::Ok => match self.image {
                Some(image) => Ok(Some(image)),
                None => Err(Failure::CaptureUnavailable("画像の参照がありません".into())),
            },
            AcquireStatus::Cancelled => Ok(None),
            AcquireStatus::PermissionDenied => Err(Failure::PermissionDenied(message)),
            AcquireStatus::Unavailable => Err(Failure::CaptureUnavailable(message)),
        }
    }
}

/// 文字認識の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionReport {
    pub image: ImageRef,
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

/// 取得から認識までの結果（表示内容そのもの）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Failure>,
}

impl DetectReport {
    pub fn from_screen(screen: &Screen) -> Self {
        Self {
            image: screen.selected_image().cloned(),
            lines: screen.recognized_lines().map(|l| l.to_vec()).unwrap_or_default(),
            notice: screen.notice().cloned(),
        }
    }
}
