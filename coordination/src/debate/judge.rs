//! Judge node — reads the full transcript and records a structured verdict.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::DebateError;
use super::prompts;
use super::state::{render_transcript, DebateState, DebateUpdate, Side, Verdict};
use crate::oracle::{SharedOracle, StructuredRequest};

/// Tool/schema name the verdict is requested under.
pub const VERDICT_SCHEMA_NAME: &str = "record_verdict";

const VERDICT_SCHEMA_DESCRIPTION: &str =
    "Record the debate verdict: a short justification and exactly one winning side.";

/// Output shape the judge must produce. Anything else is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct JudgeOutput {
    #[schemars(
        description = "Explanation of the decision, roughly 300-500 characters, weighing both sides"
    )]
    pub reasoning: String,
    #[schemars(description = "Winning side: FOR (affirmative) or AGAINST (negative)")]
    pub winner: Side,
}

impl JudgeOutput {
    /// Validate a raw oracle value against the verdict schema.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DebateError> {
        let output: Self =
            serde_json::from_value(value).map_err(|e| DebateError::JudgingFailure {
                reason: format!("verdict does not match schema: {e}"),
            })?;
        if output.reasoning.trim().is_empty() {
            return Err(DebateError::JudgingFailure {
                reason: "verdict reasoning is empty".to_string(),
            });
        }
        Ok(output)
    }
}

impl From<JudgeOutput> for Verdict {
    fn from(output: JudgeOutput) -> Self {
        Verdict {
            winner: output.winner,
            reasoning: output.reasoning.trim().to_string(),
        }
    }
}

/// JSON Schema for [`JudgeOutput`], with subschemas inlined so providers
/// that do not resolve `$ref` still see the enum.
pub fn verdict_schema() -> Result<serde_json::Value, serde_json::Error> {
    let generator = SchemaSettings::draft07()
        .with(|s| s.inline_subschemas = true)
        .into_generator();
    let root = generator.into_root_schema_for::<JudgeOutput>();
    let mut value = serde_json::to_value(root)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
    }
    Ok(value)
}

/// The judge. Runs once, after the last round.
pub struct JudgeNode {
    oracle: SharedOracle,
    model: String,
    max_tokens: u32,
}

impl JudgeNode {
    pub fn new(oracle: SharedOracle, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            oracle,
            model: model.into(),
            max_tokens,
        }
    }

    /// Build the structured request for the current transcript.
    pub fn request(&self, state: &DebateState) -> Result<StructuredRequest, DebateError> {
        let schema = verdict_schema().map_err(|e| DebateError::JudgingFailure {
            reason: format!("verdict schema could not be generated: {e}"),
        })?;
        let transcript = render_transcript(state.history());
        Ok(StructuredRequest {
            system: prompts::judge_system_prompt(state.topic()),
            user: prompts::judge_instruction(&transcript),
            schema_name: VERDICT_SCHEMA_NAME.to_string(),
            schema_description: VERDICT_SCHEMA_DESCRIPTION.to_string(),
            schema,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        })
    }

    pub async fn run(&self, state: &DebateState) -> Result<DebateUpdate, DebateError> {
        let request = self.request(state)?;
        debug!(
            messages = state.history().len(),
            model = %request.model,
            "requesting verdict"
        );

        let value = self
            .oracle
            .generate_structured(request)
            .await
            .map_err(|e| DebateError::JudgingFailure {
                reason: format!("oracle could not produce a verdict: {e}"),
            })?;

        let verdict = Verdict::from(JudgeOutput::from_value(value)?);
        info!(
            winner = %verdict.winner,
            reasoning = %verdict.reasoning,
            "verdict: {} wins",
            verdict.winner.label()
        );

        Ok(DebateUpdate::verdict(verdict))
    }
}
