// src/llm/mod.rs
// Model seam for structured multimodal generation

use async_trait::async_trait;
use serde_json::Value;

pub mod gemini;

pub use gemini::GeminiClient;

/// Errors from the generation API, before the response text is interpreted
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("response contained no text")]
    NoText,

    #[error("missing credential: {0}")]
    Credential(String),
}

/// Inline image part of a multimodal request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub media_type: String,
    /// Base64 payload, no data-URL header
    pub data: String,
}

/// One image + instruction request whose answer must match `response_schema`
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub image: InlineImage,
    pub prompt: String,
    pub response_schema: Value,
}

/// Anything that can turn a structured request into JSON text.
///
/// `GeminiClient` is the production implementation.
#[async_trait]
pub trait CaptionModel: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the raw response text, expected to be JSON matching the schema.
    async fn generate_structured(&self, request: &StructuredRequest) -> Result<String, ModelError>;
}
