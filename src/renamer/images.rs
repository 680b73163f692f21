//! 画像リネーマー - 内容の説明文に基づく画像ファイルの自動リネーム

use crate::gemini::GeminiClient;
use crate::rename::{rename_with_unique_name, sanitize_filename};
use anyhow::{Context, Result};
use image::GenericImageView;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// 対応する画像拡張子
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// 説明文生成用のプロンプト
const DESCRIPTION_PROMPT: &str =
    "Describe this image in 1-5 words, suitable for a filename. Do not include file extensions.";

/// 縮小画像の最大辺長（アップロードサイズを抑えるため）
const THUMBNAIL_SIZE: u32 = 512;

/// レート制限回避のためファイルごとに挟む待機時間
const RATE_LIMIT_DELAY: Duration = Duration::from_secs(2);

/// 画像ファイルを内容に基づいてリネームする
pub struct ImageRenamer {
    client: GeminiClient,
}

impl ImageRenamer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// 入力パス（単一ファイルまたはディレクトリ）を処理
    ///
    /// ディレクトリの場合はサブディレクトリも再帰的に走査する。
    pub async fn run(&self, input: &Path) -> Result<()> {
        if input.is_file() {
            tracing::info!("単一ファイルを処理: {:?}", input);
            self.process_file(input).await;
        } else if input.is_dir() {
            tracing::info!("ディレクトリを再帰的に処理: {:?}", input);
            // リネームで走査中のエントリが変わらないよう、先にファイル一覧を確定させる
            let files: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect();
            for file in files {
                self.process_file(&file).await;
            }
        } else {
            anyhow::bail!("入力パスが見つかりません: {:?}", input);
        }
        Ok(())
    }

    /// 1ファイルを処理（失敗してもバッチは継続）
    async fn process_file(&self, path: &Path) {
        if !is_supported_image(path) {
            tracing::debug!("対応していないファイルをスキップ: {:?}", path);
            return;
        }

        tracing::info!("処理中: {:?}", path);
        match self.rename_image(path).await {
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

        // レート制限対策の待機
        tokio::time::sleep(RATE_LIMIT_DELAY).await;
    }

    /// 画像の内容から新しいファイル名を生成してリネーム
    ///
    /// 縮小コピーは成否にかかわらず `TempImage` のドロップで削除される。
    async fn rename_image(&self, path: &Path) -> Result<Option<PathBuf>> {
        let temp = TempImage::create(path, THUMBNAIL_SIZE)?;

        let description = self
            .client
            .generate_with_image(DESCRIPTION_PROMPT, temp.path())
            .await?;

        let sanitized = sanitize_filename(&description);
        if sanitized.is_empty() {
            tracing::warn!("使用できるファイル名が得られませんでした: {:?}", path);
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
}

/// 拡張子で対応画像かどうかを判定
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// 縮小された一時画像（ドロップ時に自動削除）
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// 元画像の縮小コピーを同じディレクトリに `<ファイル名>.tmp` として作成
    pub fn create(original: &Path, max_size: u32) -> Result<Self> {
        let reader = image::ImageReader::open(original)
            .with_context(|| format!("画像ファイルを開けません: {:?}", original))?
            .with_guessed_format()
            .with_context(|| format!("画像フォーマットの判定に失敗: {:?}", original))?;
        let format = reader.format().unwrap_or(image::ImageFormat::Png);

        let img = reader
            .decode()
            .with_context(|| format!("画像のデコードに失敗: {:?}", original))?;

        let file_name = original
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image");
        let temp_path = original.with_file_name(format!("{}.tmp", file_name));

        // 上限より小さい画像は拡大せずそのままコピーする
        let thumbnail = if img.width() > max_size || img.height() > max_size {
            img.thumbnail(max_size, max_size)
        } else {
            img
        };
        thumbnail
            .save_with_format(&temp_path, format)
            .with_context(|| format!("縮小画像の保存に失敗: {:?}", temp_path))?;

        tracing::debug!("一時縮小画像を作成: {:?}", temp_path);
        Ok(Self { path: temp_path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("一時ファイルの削除に失敗: {:?}: {}", self.path, e);
            } else {
                tracing::debug!("一時ファイルを削除: {:?}", self.path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn write_test_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::new(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.JPG")));
        assert!(is_supported_image(Path::new("photo.Tiff")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("archive.pdf")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn temp_image_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let original = write_test_png(dir.path(), "photo.png", 16, 16);

        let temp_path = {
            let temp = TempImage::create(&original, THUMBNAIL_SIZE).unwrap();
            assert!(temp.path().exists());
            temp.path().to_path_buf()
        };

        assert!(!temp_path.exists());
        assert!(original.exists());
    }

    #[test]
    fn thumbnail_is_bounded_and_keeps_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let original = write_test_png(dir.path(), "wide.png", 1024, 512);

        let temp = TempImage::create(&original, THUMBNAIL_SIZE).unwrap();
        let thumb = image::ImageReader::open(temp.path())
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();

        assert_eq!(thumb.width(), 512);
        assert_eq!(thumb.height(), 256);
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let dir = tempfile::tempdir().unwrap();
        let original = write_test_png(dir.path(), "small.png", 20, 10);

        let temp = TempImage::create(&original, THUMBNAIL_SIZE).unwrap();
        let thumb = image::ImageReader::open(temp.path())
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();

        assert_eq!((thumb.width(), thumb.height()), (20, 10));
    }

    #[test]
    fn create_fails_on_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(TempImage::create(&path, THUMBNAIL_SIZE).is_err());
    }
}
