use clap::{Parser, Subcommand};
use std::path::PathBuf;
use text_detector_common::{EmptyTextPolicy, SourceKind};

#[derive(Parser)]
#[command(name = "text-detector")]
#[command(about = "写真を撮影・選択して文字を抽出するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を取得して文字を認識
    Detect {
        /// 取得元 (capture/library)
        #[arg(short, long, default_value = "library")]
        source: SourceKind,

        /// 画像ファイルを直接指定（library のみ）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// ライブラリとして一覧するフォルダ
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// 文字が検出されなかった場合の扱い (preserve/clear)
        #[arg(long)]
        empty_text: Option<EmptyTextPolicy>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 画像の取得のみ行う
    Acquire {
        /// 取得元 (capture/library)
        #[arg(short, long, default_value = "capture")]
        source: SourceKind,

        /// 画像ファイルを直接指定（library のみ）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// ライブラリとして一覧するフォルダ
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 画像の文字認識のみ行う
    Recognize {
        /// 画像のパスまたは file:// URI
        #[arg(required = true)]
        image: String,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 認識言語を設定（例: eng, por, jpn）
        #[arg(long)]
        set_language: Option<String>,

        /// ページ分割モード (0-13)
        #[arg(long)]
        set_psm: Option<u8>,

        /// 文字なし時の扱い (preserve/clear)
        #[arg(long)]
        set_empty_text: Option<EmptyTextPolicy>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
