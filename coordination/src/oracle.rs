//! Oracle contract — the text-generation service participant nodes call.
//!
//! The core never talks to a model provider directly. Nodes build a request,
//! hand it to an injected [`Oracle`], and interpret the response. Concrete
//! adapters (HTTP clients, test doubles) live outside this crate.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors an oracle adapter can report.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Request(String),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response contained no usable content")]
    EmptyResponse,

    #[error("oracle response parse error: {0}")]
    Parse(String),
}

/// Plain-text completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    /// System instruction (persona, stance, rules).
    pub system: String,
    /// User instruction for this single exchange.
    pub user: String,
    /// Model identifier understood by the adapter.
    pub model: String,
    /// Output token budget.
    pub max_tokens: u32,
}

/// Schema-constrained completion request.
///
/// `schema` is a JSON Schema object describing the expected output. The
/// adapter is responsible for steering the model toward it; callers still
/// validate what comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRequest {
    pub system: String,
    pub user: String,
    /// Short identifier for the output shape (used as a tool name by some providers).
    pub schema_name: String,
    /// Human-readable description of the output shape.
    pub schema_description: String,
    /// JSON Schema the output must conform to.
    pub schema: serde_json::Value,
    pub model: String,
    pub max_tokens: u32,
}

/// Stateless request/response text-generation service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Generate free text. Fails if the response holds no usable text.
    async fn generate_text(&self, request: TextRequest) -> Result<String, OracleError>;

    /// Generate a JSON value shaped by `request.schema`.
    async fn generate_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<serde_json::Value, OracleError>;
}

/// Oracle handle shared by every node of a run.
pub type SharedOracle = Arc<dyn Oracle>;
