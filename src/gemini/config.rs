//! Gemini API の設定

use super::GeminiError;

/// 利用可能なモデル
pub const MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-flash-lite"];

/// デフォルトのモデル
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// APIキー名
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini API の設定（クライアント生成時に明示的に渡す）
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// APIキー
    pub api_key: String,
    /// モデル名
    pub model: String,
}

impl GeminiConfig {
    /// APIキーを指定して設定を作成
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// 環境変数からAPIキーを読み込む
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| GeminiError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// モデル名を変更した設定を返す
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_model() {
        let config = GeminiConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn with_model_overrides_default() {
        let config = GeminiConfig::new("test-key").with_model("gemini-2.5-flash-lite");
        assert_eq!(config.model, "gemini-2.5-flash-lite");
    }

    #[test]
    fn default_model_is_listed() {
        assert!(MODELS.contains(&DEFAULT_MODEL));
    }
}
