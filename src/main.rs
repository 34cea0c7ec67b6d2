use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use text_detector::acquire::{self, ImageSource};
use text_detector::recognizer::{Tesseract, TextRecognizer};
use text_detector::{cli, config, controller, error, logging};
use text_detector_common::{first_text, split_lines, AcquireReport, RecognitionReport, View};
use cli::{Cli, Commands};
use config::Config;
use controller::Controller;
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // デスクトップ側は標準エラーの最終行をそのまま通知に出す
    if let Err(e) = run(cli).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Detect { source, path, folder, empty_text, json } => {
            let acquirer = acquire::from_config(&config, path, folder);
            let recognizer = Tesseract::from_config(&config);
            let policy = empty_text.unwrap_or(config.empty_text);
            let controller = Controller::new(acquirer, recognizer, policy);

            if json {
                controller.trigger(source).await;
                println!("{}", serde_json::to_string_pretty(&controller.report().await)?);
                return Ok(());
            }

            println!("📷 text-detector - 文字認識\n");

            // 1. 画像取得（対話選択があるのでスピナーは出さない）
            println!("[1/2] 画像を取得中... ({})", source);
            match controller.acquire(source).await {
                Some(image) => {
                    println!("✔ {}\n", image);

                    // 2. 文字認識
                    println!("[2/2] 文字認識中...");
                    let spinner = spinner("tesseract 実行中...");
                    controller.on_acquired(image).await;
                    spinner.finish_and_clear();
                }
                None => println!("- 画像は取得されませんでした\n"),
            }

            print_view(&controller.view().await);
        }

        Commands::Acquire { source, path, folder, json } => {
            let acquirer = acquire::from_config(&config, path, folder);
            let report = match acquirer.acquire(source).await {
                Ok(Some(image)) => AcquireReport::ok(image),
                Ok(None) => AcquireReport::cancelled(),
                Err(e) => AcquireReport::failed(&e.acquire_failure()),
            };

            if json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                match (&report.image, &report.message) {
                    (Some(image), _) => println!("✔ {}", image),
                    (None, Some(message)) => println!("⚠ {:?}: {}", report.status, message),
                    (None, None) => println!("キャンセルされました"),
                }
            }
        }

        Commands::Recognize { image, json } => {
            let image = acquire::resolve_image(&image)?;
            let recognizer = Tesseract::from_config(&config);

            if json {
                let blocks = recognizer.detect_from_uri(&image).await?;
                let report = RecognitionReport { image, blocks };
                println!("{}", serde_json::to_string(&report)?);
                return Ok(());
            }

            let spinner = spinner("文字認識中...");
            let blocks = recognizer.detect_from_uri(&image).await;
            spinner.finish_and_clear();
            let blocks = blocks?;

            println!("画像: {}", image);
            match first_text(&blocks) {
                Some(text) => {
                    for line in split_lines(text) {
                        println!("  {}", line);
                    }
                }
                None => println!("（テキストは検出されませんでした）"),
            }
        }

        Commands::Config { set_language, set_psm, set_empty_text, show } => {
            let mut config = config;

            if let Some(language) = set_language {
                config.set_language(language)?;
                println!("✔ 認識言語を設定しました");
            }

            if let Some(psm) = set_psm {
                config.set_psm(psm)?;
                println!("✔ ページ分割モードを設定しました");
            }

            if let Some(policy) = set_empty_text {
                config.set_empty_text(policy)?;
                println!("✔ 文字なし時の扱いを設定しました");
            }

            if show {
                println!("設定:");
                println!("  認識言語: {}", config.language());
                println!("  ページ分割モード: {}", config.psm);
                println!("  撮影コマンド: {}", config.capture_command.join(" "));
                println!("  撮影保存先: {}", config.capture_dir().display());
                println!("  ライブラリ: {}", config.library_dir().display());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  文字なし時: {}", config.empty_text);
            }
        }
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_view(view: &View) {
    if let Some(notice) = &view.notice {
        println!("⚠ {}\n", notice);
    }

    match &view.thumbnail {
        Some(image) => println!("画像: {}", image),
        None => println!("画像: なし"),
    }

    if view.lines.is_empty() {
        println!("（認識結果なし）");
        return;
    }

    println!("認識結果 ({}行):", view.lines.len());
    for line in &view.lines {
        println!("  {}", line.text);
    }
}
