//! PDF処理モジュール - メタデータとテキストの抽出

use anyhow::{Context, Result};
use lopdf::{Document, Object};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// メタデータ（Info辞書）からタイトルを取得
///
/// タイトルが存在しない場合は `Ok(None)`。ファイルを開けない・PDFとして
/// 解析できない場合のみエラーを返し、継続するかどうかは呼び出し側が決める。
pub fn metadata_title(pdf_path: impl AsRef<Path>) -> Result<Option<String>> {
    let pdf_path = pdf_path.as_ref();
    let doc = Document::load(pdf_path)
        .with_context(|| format!("PDFの読み込みに失敗: {:?}", pdf_path))?;

    let title = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| obj.as_reference().ok())
        .and_then(|id| doc.get_object(id).ok())
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|info| info.get(b"Title").ok())
        .and_then(|obj| match obj {
            Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
            _ => None,
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(title)
}

/// 先頭ページからテキストを抽出
///
/// 抽出に失敗したページ構成（不正なフォント等）は空文字列として扱い、
/// エラーにしない。ファイルを開けない場合のみエラーを返す。
pub fn extract_first_pages_text(pdf_path: impl AsRef<Path>, num_pages: usize) -> Result<String> {
    let pdf_path = pdf_path.as_ref();
    let bytes = std::fs::read(pdf_path)
        .with_context(|| format!("PDFの読み込みに失敗: {:?}", pdf_path))?;

    // pdf_extract は不正なフォントでパニックすることがあるため catch_unwind で保護
    let pages = match catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            tracing::warn!("テキスト抽出に失敗: {:?}: {}", pdf_path, e);
            return Ok(String::new());
        }
        Err(_) => {
            tracing::warn!("テキスト抽出中にパニック: {:?}", pdf_path);
            return Ok(String::new());
        }
    };

    let text = pages
        .into_iter()
        .take(num_pages)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text)
}

/// PDF文字列をデコード（UTF-16BE BOM付き、またはそのままのバイト列）
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}
