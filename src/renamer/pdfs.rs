//! PDFリネーマー - タイトルに基づくPDFファイルの自動リネーム

use crate::gemini::GeminiClient;
use crate::pdf;
use crate::rename::{rename_with_unique_name, sanitize_filename};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// タイトル推定に使う先頭ページ数
const MAX_PAGES: usize = 2;

/// モデルに渡す本文の最大文字数
const MAX_PROMPT_CHARS: usize = 2000;

/// PDFファイルをタイトルに基づいてリネームする
///
/// タイトルはメタデータを優先し、なければ本文からモデルで推定する。
pub struct PdfRenamer {
    client: GeminiClient,
}

impl PdfRenamer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// 入力パス（単一のPDFファイルまたはディレクトリ）を処理
    ///
    /// ディレクトリの場合は直下のPDFのみを対象とし、サブディレクトリは走査しない。
    pub async fn run(&self, input: &Path) -> Result<()> {
        if input.is_file() && is_pdf(input) {
            self.process_file(input).await;
        } else if input.is_dir() {
            tracing::info!("ディレクトリ内のPDFを処理: {:?}", input);
            let mut pdf_files: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("ディレクトリを開けません: {:?}", input))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_pdf(path))
                .collect();
            pdf_files.sort();

            for path in pdf_files {
                self.process_file(&path).await;
            }
        } else {
            anyhow::bail!("PDFファイルまたはディレクトリではありません: {:?}", input);
        }
        Ok(())
    }

    /// 1ファイルを処理（失敗してもバッチは継続）
    async fn process_file(&self, path: &Path) {
        tracing::info!("処理中: {:?}", path);
        match self.rename_pdf(path).await {
            Ok(Some(new_path)) => {
                tracing::info!(
                    "リネーム完了: {:?} -> {:?}",
                    path.file_name().unwrap_or_default(),
                    new_path.file_name().unwrap_or_default()
                );
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("処理に失敗: {:?}: {:#}", path, e),
        }
    }

    /// タイトルを決定してリネーム
    async fn rename_pdf(&self, path: &Path) -> Result<Option<PathBuf>> {
        let title = match self.determine_title(path).await? {
            Some(title) => title,
            None => {
                tracing::warn!("タイトルを決定できませんでした: {:?}", path);
                return Ok(None);
            }
        };

        let sanitized = sanitize_filename(&title);
        if sanitized.is_empty() {
            tracing::warn!("サニタイズ後のタイトルが空です: {:?}", path);
            return Ok(None);
        }

        if path.file_stem().and_then(|s| s.to_str()) == Some(sanitized.as_str()) {
            tracing::info!("既に適切な名前のためスキップ: {:?}", path);
            return Ok(None);
        }

        let new_path = rename_with_unique_name(path, &sanitized)
            .with_context(|| format!("リネームに失敗: {:?}", path))?;
        Ok(Some(new_path))
    }

    /// メタデータ優先でタイトルを取得し、なければ本文からモデルで推定
    async fn determine_title(&self, path: &Path) -> Result<Option<String>> {
        if let Some(title) = pdf::metadata_title(path)? {
            tracing::debug!("メタデータからタイトルを取得: {}", title);
            return Ok(Some(title));
        }

        tracing::info!("メタデータにタイトルがありません。本文から推定します: {:?}", path);
        let text = pdf::extract_first_pages_text(path, MAX_PAGES)?;
        if text.trim().is_empty() {
            tracing::warn!("テキストを抽出できませんでした: {:?}", path);
            return Ok(None);
        }

        let title = self.client.generate(&build_title_prompt(&text)).await?;
        let title = title.trim().to_string();
        Ok((!title.is_empty()).then_some(title))
    }
}

/// 本文の抜粋からタイトル推定用プロンプトを組み立てる
fn build_title_prompt(text: &str) -> String {
    let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    format!(
        "Analyze the following text from a document and extract the main title of the paper. \
         Provide only the title, and do not include any other text, explanations, or formatting.\n\n\
         Document Content:\n{}",
        excerpt
    )
}

/// 拡張子でPDFかどうかを判定
fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
