//! Text Detector Common Library
//!
//! CLIとデスクトップアプリで共有される型と画面状態

pub mod types;
pub mod screen;
pub mod view;
pub mod report;
pub mod error;

pub use types::{ImageRef, SourceKind, TextBlock, first_text, split_lines};
pub use screen::{Applied, EmptyTextPolicy, Failure, Generation, Screen, ScreenState};
pub use view::{LineItem, View, render};
pub use report::{AcquireReport, AcquireStatus, DetectReport, RecognitionReport};
pub use error::{Error, Result};
