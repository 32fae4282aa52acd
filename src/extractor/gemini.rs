//! Gemini API連携
//!
//! generateContentへ画像をインラインBase64で送り、JSON制約付きの
//! テキストレスポンスを受け取る。タイムアウトと再試行回数は
//! 設定で明示的に制限する。

use super::VisionModel;
use crate::config::Config;
use crate::error::{ReportAiError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: i32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// Gemini APIクライアント
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ReportAiError::ApiCall(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    fn build_request(image: &[u8], mime_type: &str, instruction: &str) -> GeminiRequest {
        GeminiRequest {
            system_instruction: Content {
                parts: vec![Part::Text {
                    text: instruction.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "This is the image".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: STANDARD.encode(image),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 8192,
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    async fn call_api(&self, request: &GeminiRequest) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ReportAiError::ApiCall(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReportAiError::ApiCall(e.to_string()))?;

        // 不正なUTF-8は置換して読む（警告は出す）
        let body = match std::str::from_utf8(&bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                eprintln!("警告: APIレスポンスに不正なUTF-8が含まれています（置換して読み込み）");
                String::from_utf8_lossy(&bytes).into_owned()
            }
        };

        if !status.is_success() {
            return Err(ReportAiError::ApiCall(format!(
                "API error {}: {}",
                status,
                body.trim()
            )));
        }

        let payload: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| ReportAiError::ApiCall(format!("レスポンス形式が不正: {}", e)))?;

        payload
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ReportAiError::ApiCall("Empty response".to_string()))
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(&self, image: &[u8], mime_type: &str, instruction: &str) -> Result<String> {
        let request = Self::build_request(image, mime_type, instruction);

        let mut attempt = 0;
        loop {
            match self.call_api(&request).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    eprintln!("  再試行 {}/{}: {}", attempt, self.max_retries, e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
