//! Gemini API モジュール - 生成モデルへの問い合わせ

mod client;
mod config;

pub use client::GeminiClient;
pub use config::{GeminiConfig, DEFAULT_MODEL, MODELS};

use thiserror::Error;

/// Gemini API 呼び出しのエラー
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY 環境変数が設定されていません")]
    MissingApiKey,

    #[error("リクエストに失敗: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini API エラー: {0}")]
    Api(String),

    #[error("ファイルの読み込みに失敗: {0}")]
    Io(#[from] std::io::Error),
}
