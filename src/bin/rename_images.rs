//! 画像リネームツール - 画像の内容からファイル名を自動生成する

use anyhow::Result;
use clap::Parser;
use gemini_renamer::gemini::{GeminiClient, GeminiConfig, DEFAULT_MODEL};
use gemini_renamer::ImageRenamer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rename image files based on their content")]
struct Args {
    /// Path to a single image file or a directory containing images
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Gemini model name
    #[arg(short = 'm', long = "model", default_value = DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ロギング初期化
    tracing_subscriber::fmt::init();

    // 環境変数の読み込み
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = GeminiConfig::from_env()?.with_model(&args.model);
    let renamer = ImageRenamer::new(GeminiClient::new(config));

    renamer.run(&args.input).await
}
