use text_detector_common::{AcquireReport, Generation, ImageRef, TextBlock};

/// ワーカースレッドからUIへの通知
pub enum UiMessage {
    Acquired(Result<AcquireReport, String>),
    Recognized {
        generation: Generation,
        image: ImageRef,
        result: Result<Vec<TextBlock>, String>,
    },
}

pub struct ThumbData {
    pub uri: String,
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}
