//! Gemini API連携
//!
//! generateContent RESTエンドポイントへプロンプト + 画像を送り、
//! レスポンス本文のテキストを取り出す。リトライはしない。
//! エラーは認証・レート制限・ポリシーブロック・その他に分類して返す。

use crate::error::{ProfileAiError, Result};
use crate::media::ImagePayload;
use profile_photo_common::ResponseFormat;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// エラー本文の表示上限
const ERROR_BODY_LIMIT: usize = 200;

/// Gemini APIリクエスト
#[derive(Serialize)]
pub struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
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
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

const HARM_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

fn default_safety_settings() -> Vec<SafetySetting> {
    HARM_CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category: category.to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        })
        .collect()
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
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

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// 解析リクエストを構築
///
/// 生成設定は temperature 0.9 / top_p 0.95 / top_k 40 /
/// max_output_tokens 1024。JSON形式を要求する場合のみ
/// responseMimeType を付ける。
pub fn build_request(prompt: String, image: &ImagePayload, format: ResponseFormat) -> GeminiRequest {
    let response_mime_type = match format {
        ResponseFormat::Json => Some("application/json".to_string()),
        ResponseFormat::Text => None,
    };

    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.to_string(),
                        data: image.data.clone(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1024,
            response_mime_type,
        },
        safety_settings: default_safety_settings(),
    }
}

/// Gemini API呼び出し（共通処理）
pub async fn generate_content(
    api_key: &str,
    model: &str,
    timeout_seconds: u64,
    request: &GeminiRequest,
) -> Result<String> {
    let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, api_key);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| ProfileAiError::ApiCall(e.to_string()))?;

    let response = client
        .post(&url)
        .json(request)
        .send()
        .await
        .map_err(|e| ProfileAiError::ApiCall(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_api_error(status, &body));
    }

    let payload: GeminiResponse = response
        .json()
        .await
        .map_err(|e| ProfileAiError::ApiCall(format!("invalid response body: {}", e)))?;

    if let Some(feedback) = &payload.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Err(ProfileAiError::ContentBlocked(reason.clone()));
        }
    }

    payload
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.clone())
        .ok_or(ProfileAiError::EmptyResponse)
}

/// 写真1枚を解析してレスポンステキストを返す
pub async fn analyze_image(
    api_key: &str,
    model: &str,
    timeout_seconds: u64,
    prompt: String,
    image: &ImagePayload,
    format: ResponseFormat,
) -> Result<String> {
    let request = build_request(prompt, image, format);
    generate_content(api_key, model, timeout_seconds, &request).await
}

/// HTTPエラーをエラー種別に分類
fn classify_api_error(status: StatusCode, body: &str) -> ProfileAiError {
    let body = truncate(body, ERROR_BODY_LIMIT);
    match status.as_u16() {
        401 | 403 => ProfileAiError::AuthFailed(format!("status {}: {}", status, body)),
        400 if body.contains("API key not valid") => {
            ProfileAiError::AuthFailed(format!("status {}: {}", status, body))
        }
        429 => ProfileAiError::QuotaExceeded(format!("status {}: {}", status, body)),
        _ => ProfileAiError::ApiCall(format!("status {}: {}", status, body)),
    }
}

fn truncate(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(limit) {
        Some((i, _)) => format!("{}...", &trimmed[..i]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> ImagePayload {
        ImagePayload {
            file_name: "photo.jpg".to_string(),
            mime_type: "image/jpeg",
            data: "base64data".to_string(),
        }
    }

    // =============================================
    // リクエストシリアライズテスト
    // =============================================

    #[test]
    fn test_request_serialize_text_format() {
        let request = build_request("test prompt".to_string(), &sample_image(), ResponseFormat::Text);

        let json = serde_json::to_string(&request).expect("serialize failed");
        assert!(json.contains("\"contents\""));
        assert!(json.contains("\"text\":\"test prompt\""));
        assert!(json.contains("\"inline_data\""));
        assert!(json.contains("\"mime_type\":\"image/jpeg\""));
        assert!(json.contains("\"data\":\"base64data\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"temperature\":0.9"));
        assert!(json.contains("\"topP\":0.95"));
        assert!(json.contains("\"topK\":40"));
        assert!(json.contains("\"maxOutputTokens\":1024"));
        assert!(!json.contains("responseMimeType"));
    }

    #[test]
    fn test_request_serialize_json_format() {
        let request = build_request("test prompt".to_string(), &sample_image(), ResponseFormat::Json);

        let json = serde_json::to_string(&request).expect("serialize failed");
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
    }

    #[test]
    fn test_request_includes_safety_settings() {
        let request = build_request("p".to_string(), &sample_image(), ResponseFormat::Text);

        let json = serde_json::to_string(&request).expect("serialize failed");
        assert!(json.contains("\"safetySettings\""));
        assert!(json.contains("HARM_CATEGORY_HARASSMENT"));
        assert!(json.contains("HARM_CATEGORY_DANGEROUS_CONTENT"));
        assert!(json.contains("BLOCK_MEDIUM_AND_ABOVE"));
    }

    // =============================================
    // レスポンスデシリアライズテスト
    // =============================================

    #[test]
    fn test_response_deserialize() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "analysis text"
                    }]
                }
            }]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].content.parts[0].text, "analysis text");
    }

    #[test]
    fn test_response_deserialize_blocked() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).expect("deserialize failed");
        assert!(response.candidates.is_empty());
        let feedback = response.prompt_feedback.expect("feedback missing");
        assert_eq!(feedback.block_reason.as_deref(), Some("SAFETY"));
    }

    // =============================================
    // エラー分類テスト
    // =============================================

    #[test]
    fn test_classify_unauthorized() {
        let error = classify_api_error(StatusCode::FORBIDDEN, "permission denied");
        assert!(matches!(error, ProfileAiError::AuthFailed(_)));
    }

    #[test]
    fn test_classify_invalid_key_in_bad_request() {
        let error = classify_api_error(StatusCode::BAD_REQUEST, "API key not valid.");
        assert!(matches!(error, ProfileAiError::AuthFailed(_)));
    }

    #[test]
    fn test_classify_quota() {
        let error = classify_api_error(StatusCode::TOO_MANY_REQUESTS, "quota exceeded");
        assert!(matches!(error, ProfileAiError::QuotaExceeded(_)));
    }

    #[test]
    fn test_classify_other_is_api_call() {
        let error = classify_api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(error, ProfileAiError::ApiCall(_)));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(500);
        let truncated = truncate(&body, ERROR_BODY_LIMIT);
        assert!(truncated.len() < body.len());
        assert!(truncated.ends_with("..."));
    }
}
