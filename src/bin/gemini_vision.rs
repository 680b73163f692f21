//! 画像質問応答ツール - 画像と質問をGeminiに送信して回答を表示する

use anyhow::{Context, Result};
use clap::Parser;
use gemini_renamer::gemini::{GeminiClient, GeminiConfig, DEFAULT_MODEL};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate content from an image using the Gemini model")]
struct Args {
    /// Path to the input image file
    #[arg(short = 'i', long = "filename")]
    filename: PathBuf,

    /// Prompt text for content generation
    #[arg(short = 'q', long = "question", default_value = "Ask question about the image")]
    question: String,

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

    anyhow::ensure!(
        args.filename.is_file(),
        "画像ファイルが見つかりません: {:?}",
        args.filename
    );

    let config = GeminiConfig::from_env()?.with_model(&args.model);
    let client = GeminiClient::new(config);

    let text = client
        .generate_with_image(&args.question, &args.filename)
        .await
        .context("コンテンツ生成に失敗")?;

    println!("Generated Content:");
    println!("{}", text);

    Ok(())
}
