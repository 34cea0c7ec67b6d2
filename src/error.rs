use text_detector_common::Failure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextDetectorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像ファイルではありません: {0}")]
    NotAnImage(String),

    #[error("アクセスが拒否されました: {0}")]
    PermissionDenied(String),

    #[error("カメラを利用できません: {0}")]
    CaptureUnavailable(String),

    #[error("文字認識に失敗: {0}")]
    RecognitionFailed(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("タイムアウト: {0}秒以内に完了しませんでした")]
    Timeout(u64),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] text_detector_common::Error),
}

impl TextDetectorError {
    /// 画像取得段階の失敗として画面に出す内容
    pub fn acquire_failure(&self) -> Failure {
        match self {
            TextDetectorError::PermissionDenied(msg) => Failure::PermissionDenied(msg.clone()),
            TextDetectorError::CaptureUnavailable(msg) => Failure::CaptureUnavailable(msg.clone()),
            other => Failure::CaptureUnavailable(other.to_string()),
        }
    }

    /// 文字認識段階の失敗として画面に出す内容
    pub fn recognition_failure(&self) -> Failure {
        match self {
            TextDetectorError::RecognitionFailed(msg) => Failure::RecognitionFailed(msg.clone()),
            other => Failure::RecognitionFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TextDetectorError>;
