//! ログ初期化
//!
//! `--json` の標準出力を汚さないよう、ログは標準エラーに出す。
//! RUST_LOG で上書き可能（例: RUST_LOG=text_detector=debug）

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "text_detector=debug,text_detector_common=debug"
    } else {
        "text_detector=info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
