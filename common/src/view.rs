//! 表示内容の生成（画面状態の純関数）

use crate::screen::Screen;
use crate::types::ImageRef;

/// 表示する1行。key は同じ文字列の行が複数あっても一意
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub thumbnail: Option<ImageRef>,
    pub lines: Vec<LineItem>,
    pub notice: Option<String>,
}

pub fn render(screen: &Screen) -> View {
    let lines = screen
        .recognized_lines()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, text)| LineItem {
            key: format!("{text}-{index}"),
            text: text.clone(),
        })
        .collect();

    View {
        thumbnail: screen.selected_image().cloned(),
        lines,
        notice: screen.notice().map(|f| f.to_string()),
    }
}
