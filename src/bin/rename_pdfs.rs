//! PDFリネームツール - タイトルからファイル名を自動生成する

use anyhow::Result;
use clap::Parser;
use gemini_renamer::gemini::{GeminiClient, GeminiConfig, DEFAULT_MODEL};
use gemini_renamer::PdfRenamer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rename PDF files based on their title")]
struct Args {
    /// Path to a PDF file or a directory containing PDF files
    #[arg(index = 1)]
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
    let renamer = PdfRenamer::new(GeminiClient::new(config));

    renamer.run(&args.input).await
}
