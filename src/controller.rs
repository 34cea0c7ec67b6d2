//! 取得→認識→画面更新の制御
//!
//! 画面状態は1つのセルに置き、ロックは状態の読み書きの間だけ取る
//! （外部機能の待ち時間中は保持しない）。認識の投入ごとに世代番号を取り、
//! 結果が返った時点で新しい投入があれば破棄する。

use crate::acquire::ImageSource;
use crate::recognizer::TextRecognizer;
use text_detector_common::{
    render, Applied, DetectReport, EmptyTextPolicy, ImageRef, Screen, SourceKind, View,
};
use tokio::sync::Mutex;

pub struct Controller<S, R> {
    source: S,
    recognizer: R,
    screen: Mutex<Screen>,
}

impl<S: ImageSource, R: TextRecognizer> Controller<S, R> {
    pub fn new(source: S, recognizer: R, policy: EmptyTextPolicy) -> Self {
        Self {
            source,
            recognizer,
            screen: Mutex::new(Screen::new(policy)),
        }
    }

    /// ボタン操作1回分: 取得元から画像を得て認識まで行う
    pub async fn trigger(&self, kind: SourceKind) -> Applied {
        match self.acquire(kind).await {
            Some(image) => self.on_acquired(image).await,
            None => Applied::Unchanged,
        }
    }

    /// 画像取得のみ。キャンセル・失敗時は None（失敗は画面に通知）
    pub async fn acquire(&self, kind: SourceKind) -> Option<ImageRef> {
        match self.source.acquire(kind).await {
            Ok(image) => image,
            Err(e) => {
                self.screen.lock().await.report(e.acquire_failure());
                None
            }
        }
    }

    /// 取得済み画像を認識して画面に反映
    pub async fn on_acquired(&self, image: ImageRef) -> Applied {
        let generation = self.screen.lock().await.begin_recognition();
        let result = self.recognizer.detect_from_uri(&image).await;

        let mut screen = self.screen.lock().await;
        let applied = match result {
            Ok(blocks) => screen.apply_recognition(generation, image, &blocks),
            Err(e) => {
                tracing::warn!(%image, error = %e, "文字認識失敗");
                screen.apply_failure(generation, e.recognition_failure())
            }
        };

        if applied == Applied::Stale {
            tracing::debug!(generation = generation.value(), "古い認識結果を破棄");
        }
        applied
    }

    pub async fn view(&self) -> View {
        render(&*self.screen.lock().await)
    }

    pub async fn report(&self) -> DetectReport {
        DetectReport::from_screen(&*self.screen.lock().await)
    }

    pub async fn dismiss_notice(&self) {
        self.screen.lock().await.dismiss_notice();
    }
}
