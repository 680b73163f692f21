//! ジェミニリネーマー - Gemini API を使用した画像・PDF自動リネームツール
//!
//! # 機能
//! - 画像内容の説明文生成に基づく画像ファイルの自動リネーム
//! - メタデータ/本文から推定したタイトルに基づくPDFファイルの自動リネーム
//! - 画像への自由な質問応答CLI

pub mod gemini;
pub mod pdf;
pub mod rename;
pub mod renamer;

pub use gemini::{GeminiClient, GeminiConfig};
pub use renamer::{ImageRenamer, PdfRenamer};
