//! Gemini API クライアント

use super::{GeminiConfig, GeminiError};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::path::Path;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIクライアント
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// 設定からクライアントを作成
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// テキストプロンプトから生成
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        self.send_request(vec![Part::text(prompt)]).await
    }

    /// 画像付きプロンプトから生成
    pub async fn generate_with_image(
        &self,
        prompt: &str,
        image_path: impl AsRef<Path>,
    ) -> Result<String, GeminiError> {
        let image_path = image_path.as_ref();
        let image_data = std::fs::read(image_path)?;
        let base64_image = STANDARD.encode(&image_data);

        let parts = vec![
            Part::text(prompt),
            Part::inline_data(mime_type_for(image_path), base64_image),
        ];
        self.send_request(parts).await
    }

    /// generateContent エンドポイントにリクエストを送信
    async fn send_request(&self, parts: Vec<Part>) -> Result<String, GeminiError> {
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let url = format!("{}/{}:generateContent", GEMINI_API_URL, self.config.model);
        tracing::debug!("Gemini APIにリクエスト: {}", self.config.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            // エラーレスポンスからメッセージを取り出す（取れなければ本文をそのまま使う）
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GeminiError::Api(message));
        }

        let generate_response: GenerateResponse = response.json().await?;

        // 先頭候補のテキストを連結して返す
        let text = generate_response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }
}

/// 拡張子からMIMEタイプを判定
fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

// Gemini API リクエスト/レスポンス構造体

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_text_and_image_parts() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text("describe"),
                    Part::inline_data("image/png", "QUJD".to_string()),
                ],
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"text": "describe"},
                        {"inline_data": {"mime_type": "image/png", "data": "QUJD"}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn response_text_is_extracted() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "A red "}, {"text": "fox"}]}
            }]
        });
        let response: GenerateResponse = serde_json::from_value(body).unwrap();
        let text: String = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default();
        assert_eq!(text, "A red fox");
    }

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(mime_type_for(Path::new("a.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a.tiff")), "image/tiff");
        assert_eq!(mime_type_for(Path::new("a")), "application/octet-stream");
    }
}
