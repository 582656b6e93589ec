//! Gemini generateContent client for structured (JSON) output
//!
//! Sends one inline image plus an instruction, with `responseMimeType` and
//! `responseSchema` set so the answer comes back as parseable JSON text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{CaptionModel, InlineImage, ModelError, StructuredRequest};
use crate::config::CaptionConfig;

pub struct GeminiClient {
    client: Client,
    /// Checked per request, so a missing key surfaces as a failed generation
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn from_config(config: &CaptionConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the wire request body for a structured request
    pub fn build_body(request: &StructuredRequest) -> Value {
        // Serializing plain derive structs to Value cannot fail
        serde_json::to_value(GeminiRequest::from(request)).unwrap_or(Value::Null)
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: GeminiResponse) -> Result<String, ModelError> {
        if let Some(error) = response.error {
            return Err(ModelError::Api(error.message));
        }

        let text: String = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::NoText);
        }
        Ok(text)
    }
}

#[async_trait]
impl CaptionModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_structured(&self, request: &StructuredRequest) -> Result<String, ModelError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ModelError::Credential("GEMINI_API_KEY not set".to_string()))?;

        let body = GeminiRequest::from(request);
        debug!(
            "Gemini request to {} ({} image, prompt {} chars)",
            self.model,
            request.image.media_type,
            request.prompt.len()
        );

        let mut builder = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status { status, body });
        }

        let api_response: GeminiResponse = response.json().await?;
        Self::extract_text(api_response)
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

/// Part order matters: image first, then the instruction
#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

impl From<&StructuredRequest> for GeminiRequest {
    fn from(request: &StructuredRequest) -> Self {
        let InlineImage { media_type, data } = &request.image;
        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![
                    GeminiPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: media_type.clone(),
                            data: data.clone(),
                        },
                    },
                    GeminiPart::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.response_schema.clone(),
            },
        }
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> StructuredRequest {
        StructuredRequest {
            image: InlineImage {
                media_type: "image/png".into(),
                data: "iVBORw0KGgo=".into(),
            },
            prompt: "caption this".into(),
            response_schema: json!({ "type": "OBJECT" }),
        }
    }

    fn parse(raw: Value) -> Result<String, ModelError> {
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        GeminiClient::extract_text(response)
    }

    #[test]
    fn test_build_body_shape() {
        let body = GeminiClient::build_body(&request());

        assert_eq!(body["contents"][0]["role"], "user");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw0KGgo=");
        assert_eq!(parts[1]["text"], "caption this");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let text = parse(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"captions\":" }, { "text": "[\"a\"]}" }] }
            }]
        }))
        .unwrap();
        assert_eq!(text, "{\"captions\":[\"a\"]}");
    }

    #[test]
    fn test_extract_text_api_error() {
        let err = parse(json!({ "error": { "message": "quota exceeded" } })).unwrap_err();
        assert!(matches!(err, ModelError::Api(ref m) if m == "quota exceeded"));
    }

    #[test]
    fn test_extract_text_no_candidates() {
        assert!(matches!(parse(json!({ "candidates": [] })), Err(ModelError::NoText)));
        assert!(matches!(parse(json!({})), Err(ModelError::NoText)));
        assert!(matches!(
            parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] })),
            Err(ModelError::NoText)
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_request_time() {
        let client = GeminiClient::from_config(&CaptionConfig::default());
        let err = client.generate_structured(&request()).await.unwrap_err();
        assert!(matches!(err, ModelError::Credential(ref m) if m.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_from_config() {
        let config = CaptionConfig {
            api_key: Some("k".into()),
            ..CaptionConfig::default()
        };
        let client = GeminiClient::from_config(&config);
        assert_eq!(client.api_key.as_deref(), Some("k"));
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
