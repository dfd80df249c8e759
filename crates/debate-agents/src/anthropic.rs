//! Anthropic Messages API oracle.
//!
//! Plain completions read the first text block. Structured completions force
//! a single tool whose `input_schema` is the requested schema and read the
//! tool input back.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use coordination::oracle::{Oracle, OracleError, StructuredRequest, TextRequest};

use crate::config::AnthropicEndpoint;
use crate::telemetry::duration_ms;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Oracle backed by `POST {base_url}/v1/messages`.
pub struct AnthropicOracle {
    endpoint: AnthropicEndpoint,
    client: reqwest::Client,
}

impl AnthropicOracle {
    pub fn new(endpoint: AnthropicEndpoint) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .map_err(|e| OracleError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { endpoint, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.endpoint.base_url)
    }

    async fn post(&self, body: &Value) -> Result<Value, OracleError> {
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.endpoint.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| OracleError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(e.to_string()))?;
        debug!(
            elapsed_ms = duration_ms(start.elapsed()),
            stop_reason = value["stop_reason"].as_str().unwrap_or("unknown"),
            "anthropic response"
        );
        Ok(value)
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    async fn generate_text(&self, request: TextRequest) -> Result<String, OracleError> {
        let response = self.post(&text_body(&request)).await?;
        extract_text(&response)
    }

    async fn generate_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<Value, OracleError> {
        let response = self.post(&structured_body(&request)).await?;
        extract_tool_input(&response, &request.schema_name)
    }
}

/// Request body for a plain completion.
pub fn text_body(request: &TextRequest) -> Value {
    json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "system": request.system,
        "messages": [{
            "role": "user",
            "content": request.user
        }]
    })
}

/// Request body for a schema-constrained completion.
pub fn structured_body(request: &StructuredRequest) -> Value {
    json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "system": request.system,
        "messages": [{
            "role": "user",
            "content": request.user
        }],
        "tools": [{
            "name": request.schema_name,
            "description": request.schema_description,
            "input_schema": request.schema
        }],
        "tool_choice": {
            "type": "tool",
            "name": request.schema_name
        }
    })
}

/// First non-blank text block of a Messages API response.
pub fn extract_text(response: &Value) -> Result<String, OracleError> {
    response["content"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(OracleError::EmptyResponse)
}

/// Input of the `tool_use` block named `tool`.
pub fn extract_tool_input(response: &Value, tool: &str) -> Result<Value, OracleError> {
    response["content"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|block| block["type"] == "tool_use" && block["name"] == tool)
        .map(|block| block["input"].clone())
        .filter(|input| !input.is_null())
        .ok_or(OracleError::EmptyResponse)
}
