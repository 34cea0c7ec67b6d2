//! 外部コマンド実行（カメラ撮影用）

use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// コマンドを実行して出力を待つ。時間切れは `ErrorKind::TimedOut`
pub async fn run(program: &str, args: &[String], timeout: Duration) -> io::Result<Output> {
    tracing::debug!(program, ?args, "外部コマンド実行");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(timeout, child).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("{} did not finish within {:?}", program, timeout),
        )),
    }
}

/// 標準エラーを1行に整形
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let output = run("sh", &["-c".into(), "echo hello".into()], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let err = run("text-detector-no-such-program", &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let err = run("sh", &["-c".into(), "sleep 5".into()], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[tokio::test]
    async fn test_stderr_text_trimmed() {
        let output = run("sh", &["-c".into(), "echo ' oops ' >&2; exit 3".into()], Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(stderr_text(&output), "oops");
    }
}
