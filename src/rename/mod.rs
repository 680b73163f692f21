//! ファイル名処理モジュール - サニタイズと重複回避

use regex::Regex;
use std::path::{Path, PathBuf};

/// ファイル名に使用できない文字
const INVALID_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// サニタイズ後の最大文字数
const MAX_FILENAME_LEN: usize = 100;

/// 任意のテキストをファイル名として使える形に変換
///
/// 無効な文字を除去し、空白（改行・タブ含む）をアンダースコアに正規化する。
/// 結果が空文字列になることもあり、その場合は「使えるタイトルなし」として扱う。
pub fn sanitize_filename(text: &str) -> String {
    // 無効な文字を除去
    let cleaned: String = text.chars().filter(|c| !INVALID_CHARS.contains(c)).collect();

    // 連続する空白を1つのアンダースコアに置換
    let whitespace_re = Regex::new(r"\s+").unwrap();
    let mut result = whitespace_re.replace_all(cleaned.trim(), "_").to_string();

    // 連続するアンダースコアを1つに
    let underscore_re = Regex::new(r"_+").unwrap();
    result = underscore_re.replace_all(&result, "_").to_string();

    // 先頭と末尾のアンダースコアを削除
    result = result.trim_matches('_').to_string();

    // 最大文字数に制限
    if result.chars().count() > MAX_FILENAME_LEN {
        result = result.chars().take(MAX_FILENAME_LEN).collect();
        result = result.trim_matches('_').to_string();
    }

    result
}

/// 重複しないファイル名を取得（同名ファイルがある場合は連番を付与）
pub fn unique_filename(directory: &Path, stem: &str, extension: &str) -> String {
    let compose = |name: &str| {
        if extension.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, extension)
        }
    };

    let mut final_name = compose(stem);
    let mut counter = 1;

    while directory.join(&final_name).exists() {
        final_name = compose(&format!("{}_{}", stem, counter));
        counter += 1;
    }

    final_name
}

/// 拡張子を維持したまま重複を回避してリネームし、新しいパスを返す
pub fn rename_with_unique_name(original: &Path, new_stem: &str) -> std::io::Result<PathBuf> {
    let directory = original.parent().unwrap_or(Path::new("."));
    let extension = original.extension().and_then(|e| e.to_str()).unwrap_or("");

    let new_name = unique_filename(directory, new_stem, extension);
    let new_path = directory.join(&new_name);

    std::fs::rename(original, &new_path)?;
    Ok(new_path)
}
