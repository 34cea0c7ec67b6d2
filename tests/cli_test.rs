//! CLIの終了コードと標準エラー出力

use std::process::Command;
use text_detector::error::TextDetectorError;

fn text_detector() -> Command {
    Command::new(env!("CARGO_BIN_EXE_text-detector"))
}

/// 失敗時は Display 形式のメッセージを最終行に出して非ゼロ終了
#[test]
fn test_recognize_missing_file_reports_message() {
    let output = text_detector()
        .args(["recognize", "file:///nonexistent/text-detector/a.jpg", "--json"])
        .output()
        .expect("failed to run text-detector");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let last = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).last();
    let expected = TextDetectorError::FileNotFound("/nonexistent/text-detector/a.jpg".into()).to_string();
    assert_eq!(last, Some(expected.as_str()));
    assert!(!stderr.contains("FileNotFound("));
}

/// 別ホストの URI は読まずに拒否
#[test]
fn test_recognize_rejects_remote_uri() {
    let output = text_detector()
        .args(["recognize", "file://server/share/a.jpg"])
        .output()
        .expect("failed to run text-detector");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid image reference"));
}
