//! Debate Orchestration — Affirmative/Negative Loop with a Judge
//!
//! State machine for a turn-based debate between two adversarial agents,
//! closed by a judge's structured verdict.
//!
//! # Debate Flow
//!
//! ```text
//! Start → AgentFor → AgentAgainst → [current_turn < max_turns?]
//!            ▲             │               │
//!            └─────────────┘               ├─ Yes → AgentFor (next round)
//!              (next round)                └─ No  → Judge → End
//! ```
//!
//! Every node returns a [`DebateUpdate`]; the orchestrator merges it into
//! the [`DebateState`] before the next node runs.

pub mod agent;
pub mod error;
pub mod judge;
pub mod orchestrator;
pub mod prompts;
pub mod state;

#[cfg(test)]
pub(crate) mod test_logs;

pub use agent::{AgentConfig, AgentNode, RhetoricalMode};
pub use error::{ConfigError, DebateError, TransitionError};
pub use judge::{verdict_schema, JudgeNode, JudgeOutput, VERDICT_SCHEMA_NAME};
pub use orchestrator::{
    should_continue, DebateConfig, DebateOrchestrator, Route, RunReport, StepEvent,
    DEFAULT_MODEL,
};
pub use state::{
    render_transcript, DebateInit, DebatePhase, DebateState, DebateTransition, DebateUpdate,
    Message, NodeId, Role, Side, Verdict,
};
