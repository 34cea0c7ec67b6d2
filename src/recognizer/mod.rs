//! 文字認識
//!
//! 画像参照を外部の文字認識エンジンに渡し、テキストブロックを受け取る。
//! 利用側は先頭ブロックの text のみを使う。

mod tesseract;

pub use tesseract::{parse_output, Tesseract};

use crate::error::Result;
use async_trait::async_trait;
use text_detector_common::{ImageRef, TextBlock};

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn detect_from_uri(&self, image: &ImageRef) -> Result<Vec<TextBlock>>;
}
