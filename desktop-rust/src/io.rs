use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;

use text_detector_common::{AcquireReport, ImageRef, RecognitionReport, TextBlock};

const CLI_NAME: &str = "text-detector";

pub fn acquire_capture() -> Result<AcquireReport> {
    let stdout = run_cli(&["acquire", "--source", "capture", "--json"])?;
    parse_acquire(&stdout)
}

pub fn recognize(image: &ImageRef) -> Result<Vec<TextBlock>> {
    let stdout = run_cli(&["recognize", image.as_str(), "--json"])?;
    Ok(parse_recognition(&stdout)?.blocks)
}

pub fn parse_acquire(stdout: &str) -> Result<AcquireReport> {
    serde_json::from_str(stdout.trim()).context("parse acquire output")
}

pub fn parse_recognition(stdout: &str) -> Result<RecognitionReport> {
    serde_json::from_str(stdout.trim()).context("parse recognize output")
}

fn run_cli(args: &[&str]) -> Result<String> {
    let cli = resolve_cli_binary();
    let out = Command::new(&cli)
        .args(args)
        .output()
        .with_context(|| format!("run {}", cli.display()))?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        bail!("{}", last_error_line(&stderr).unwrap_or("exited with an error"));
    }
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

/// ログ行の後ろにある最後の非空行（CLIのエラー本文）
fn last_error_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

pub fn resolve_cli_binary() -> PathBuf {
    let file_name = format!("{CLI_NAME}{}", std::env::consts::EXE_SUFFIX);
    let exe = std::env::current_exe().ok();
    if let Some(base_dir) = exe.as_ref().and_then(|p| p.parent()) {
        let local = base_dir.join(&file_name);
        if local.exists() {
            return local;
        }
        if let Some(target_dir) = base_dir.parent() {
            for profile in ["debug", "release"] {
                let sibling = target_dir.join(profile).join(&file_name);
                if sibling.exists() {
                    return sibling;
                }
            }
        }
    }
    PathBuf::from(file_name)
}
