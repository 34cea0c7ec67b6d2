//! 画面状態
//!
//! 選択画像と認識行を1つの状態値で保持し、認識結果ごとにまとめて更新する。
//! 認識の投入ごとに世代番号を発行し、より新しい投入がある場合は古い結果を捨てる。

use crate::types::{first_text, split_lines, ImageRef, TextBlock};
use serde::{Deserialize, Serialize};

/// 認識投入の世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 画面に表示する状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScreenState {
    #[default]
    Idle,
    Showing {
        image: ImageRef,
        lines: Vec<String>,
    },
}

/// テキストが検出されなかった場合の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyTextPolicy {
    /// 直前の認識行を残す
    #[default]
    Preserve,
    /// 認識行を空にする
    Clear,
}

impl std::str::FromStr for EmptyTextPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve" | "keep" => Ok(EmptyTextPolicy::Preserve),
            "clear" => Ok(EmptyTextPolicy::Clear),
            _ => Err(format!("Unknown policy: {}. Use preserve or clear", s)),
        }
    }
}

impl std::fmt::Display for EmptyTextPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyTextPolicy::Preserve => write!(f, "preserve"),
            EmptyTextPolicy::Clear => write!(f, "clear"),
        }
    }
}

/// ユーザーに表示する回復可能な失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum Failure {
    PermissionDenied(String),
    /// 取得元（カメラ・ライブラリ）が使えない
    CaptureUnavailable(String),
    RecognitionFailed(String),
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::PermissionDenied(msg) => write!(f, "Permission denied: {msg}"),
            Failure::CaptureUnavailable(msg) => write!(f, "Image source unavailable: {msg}"),
            Failure::RecognitionFailed(msg) => write!(f, "Text recognition failed: {msg}"),
        }
    }
}

/// 状態更新の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// 画像・行を更新した
    Updated,
    /// 状態は変えていない（通知のみ等）
    Unchanged,
    /// 新しい投入があるため破棄した
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct Screen {
    state: ScreenState,
    issued: u64,
    notice: Option<Failure>,
    policy: EmptyTextPolicy,
}

impl Screen {
    pub fn new(policy: EmptyTextPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn policy(&self) -> EmptyTextPolicy {
        self.policy
    }

    pub fn notice(&self) -> Option<&Failure> {
        self.notice.as_ref()
    }

    pub fn selected_image(&self) -> Option<&ImageRef> {
        match &self.state {
            ScreenState::Idle => None,
            ScreenState::Showing { image, .. } => Some(image),
        }
    }

    pub fn recognized_lines(&self) -> Option<&[String]> {
        match &self.state {
            ScreenState::Idle => None,
            ScreenState::Showing { lines, .. } => Some(lines),
        }
    }

    /// 認識投入時に呼ぶ。以前に発行した世代はすべて古くなる
    pub fn begin_recognition(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.issued
    }

    /// 認識結果を反映
    pub fn apply_recognition(
        &mut self,
        generation: Generation,
        image: ImageRef,
        blocks: &[TextBlock],
    ) -> Applied {
        if !self.is_current(generation) {
            return Applied::Stale;
        }

        let lines = match first_text(blocks) {
            Some(text) => split_lines(text),
            None => match self.policy {
                EmptyTextPolicy::Preserve => self
                    .recognized_lines()
                    .map(|lines| lines.to_vec())
                    .unwrap_or_default(),
                EmptyTextPolicy::Clear => Vec::new(),
            },
        };

        self.state = ScreenState::Showing { image, lines };
        self.notice = None;
        Applied::Updated
    }

    /// 認識失敗を反映。画像・行はそのまま
    pub fn apply_failure(&mut self, generation: Generation, failure: Failure) -> Applied {
        if !self.is_current(generation) {
            return Applied::Stale;
        }
        self.notice = Some(failure);
        Applied::Unchanged
    }

    /// 取得段階の失敗（権限拒否など）を通知。世代は消費しない
    pub fn report(&mut self, failure: Failure) -> Applied {
        self.notice = Some(failure);
        Applied::Unchanged
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(path: &str) -> ImageRef {
        ImageRef::parse(path).unwrap()
    }

    fn recognize(screen: &mut Screen, uri: &str, text: &str) -> Applied {
        let generation = screen.begin_recognition();
        screen.apply_recognition(generation, image(uri), &[TextBlock::new(text)])
    }

    #[test]
    fn test_new_screen_is_idle() {
        let screen = Screen::default();
        assert_eq!(screen.state(), &ScreenState::Idle);
        assert!(screen.selected_image().is_none());
        assert!(screen.recognized_lines().is_none());
        assert_eq!(screen.policy(), EmptyTextPolicy::Preserve);
    }

    #[test]
    fn test_recognition_splits_lines() {
        let mut screen = Screen::default();
        let applied = recognize(&mut screen, "file:///tmp/a.jpg", "A\nB\nC");

        assert_eq!(applied, Applied::Updated);
        assert_eq!(screen.selected_image(), Some(&image("file:///tmp/a.jpg")));
        assert_eq!(
            screen.recognized_lines().unwrap(),
            &["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_second_recognition_replaces_lines() {
        let mut screen = Screen::default();
        recognize(&mut screen, "file:///tmp/a.jpg", "one\ntwo\nthree");
        recognize(&mut screen, "file:///tmp/b.jpg", "four");

        assert_eq!(screen.selected_image(), Some(&image("file:///tmp/b.jpg")));
        assert_eq!(screen.recognized_lines().unwrap(), &["four".to_string()]);
    }

    #[test]
    fn test_empty_text_preserves_previous_lines() {
        let mut screen = Screen::default();
        recognize(&mut screen, "file:///tmp/a.jpg", "Hello\nWorld");

        let generation = screen.begin_recognition();
        let applied = screen.apply_recognition(generation, image("file:///tmp/b.jpg"), &[]);

        assert_eq!(applied, Applied::Updated);
        assert_eq!(screen.selected_image(), Some(&image("file:///tmp/b.jpg")));
        assert_eq!(
            screen.recognized_lines().unwrap(),
            &["Hello".to_string(), "World".to_string()]
        );
    }

    #[test]
    fn test_empty_text_from_idle_shows_no_lines() {
        let mut screen = Screen::default();
        let generation = screen.begin_recognition();
        screen.apply_recognition(generation, image("file:///tmp/a.jpg"), &[TextBlock::new("")]);

        assert_eq!(screen.selected_image(), Some(&image("file:///tmp/a.jpg")));
        assert!(screen.recognized_lines().unwrap().is_empty());
    }

    #[test]
    fn test_empty_text_clear_policy() {
        let mut screen = Screen::new(EmptyTextPolicy::Clear);
        recognize(&mut screen, "file:///tmp/a.jpg", "Hello");
        recognize(&mut screen, "file:///tmp/b.jpg", "   ");

        assert_eq!(screen.selected_image(), Some(&image("file:///tmp/b.jpg")));
        assert!(screen.recognized_lines().unwrap().is_empty());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut screen = Screen::default();
        let first = screen.begin_recognition();
        let second = screen.begin_recognition();

        let applied = screen.apply_recognition(second, image("file:///tmp/b.jpg"), &[TextBlock::new("new")]);
        assert_eq!(applied, Applied::Updated);

        let applied = screen.apply_recognition(first, image("file:///tmp/a.jpg"), &[TextBlock::new("old")]);
        assert_eq!(applied, Applied::Stale);
        assert_eq!(screen.selected_image(), Some(&image("file:///tmp/b.jpg")));
        assert_eq!(screen.recognized_lines().unwrap(), &["new".to_string()]);
    }

    #[test]
    fn test_stale_result_discarded_even_if_newer_pending() {
        let mut screen = Screen::default();
        let first = screen.begin_recognition();
        let _second = screen.begin_recognition();

        let applied = screen.apply_recognition(first, image("file:///tmp/a.jpg"), &[TextBlock::new("old")]);
        assert_eq!(applied, Applied::Stale);
        assert_eq!(screen.state(), &ScreenState::Idle);
    }

    #[test]
    fn test_failure_keeps_state_and_sets_notice() {
        let mut screen = Screen::default();
        recognize(&mut screen, "file:///tmp/a.jpg", "kept");

        let generation = screen.begin_recognition();
        let failure = Failure::RecognitionFailed("engine crashed".into());
        let applied = screen.apply_failure(generation, failure.clone());

        assert_eq!(applied, Applied::Unchanged);
        assert_eq!(screen.selected_image(), Some(&image("file:///tmp/a.jpg")));
        assert_eq!(screen.recognized_lines().unwrap(), &["kept".to_string()]);
        assert_eq!(screen.notice(), Some(&failure));
    }

    #[test]
    fn test_success_clears_notice() {
        let mut screen = Screen::default();
        screen.report(Failure::PermissionDenied("camera".into()));
        assert!(screen.notice().is_some());

        recognize(&mut screen, "file:///tmp/a.jpg", "text");
        assert!(screen.notice().is_none());
    }

    #[test]
    fn test_report_does_not_consume_generation() {
        let mut screen = Screen::default();
        let generation = screen.begin_recognition();
        screen.report(Failure::CaptureUnavailable("no camera".into()));

        assert!(screen.is_current(generation));
        assert_eq!(screen.state(), &ScreenState::Idle);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("preserve".parse::<EmptyTextPolicy>().unwrap(), EmptyTextPolicy::Preserve);
        assert_eq!("CLEAR".parse::<EmptyTextPolicy>().unwrap(), EmptyTextPolicy::Clear);
        assert!("drop".parse::<EmptyTextPolicy>().is_err());
    }

    #[test]
    fn test_failure_serializes_with_kind() {
        let json = serde_json::to_string(&Failure::PermissionDenied("camera".into())).unwrap();
        assert_eq!(json, r#"{"kind":"permissionDenied","message":"camera"}"#);
    }

    #[test]
    fn test_unavailable_notice_names_no_device() {
        let notice = Failure::CaptureUnavailable("folder missing: /photos".into()).to_string();
        assert_eq!(notice, "Image source unavailable: folder missing: /photos");
    }
}
