//! Debate error taxonomy.

use std::time::Duration;

use thiserror::Error;

use super::state::{DebatePhase, NodeId, Role};
use crate::oracle::OracleError;

/// Invalid run inputs, caught before any node executes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("debate topic must not be empty")]
    EmptyTopic,

    #[error("turn count must be a positive integer")]
    NonPositiveTurns,

    #[error("invalid turn count '{input}': expected a positive integer")]
    InvalidTurns { input: String },

    #[error("required setting {name} is not set")]
    MissingSetting { name: &'static str },
}

/// Error for invalid phase transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition {from} → {to}: {reason}")]
pub struct TransitionError {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub reason: String,
}

/// Fatal failure of a debate run. No variant is retried.
#[derive(Debug, Error)]
pub enum DebateError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("oracle failure during {role} turn: {source}")]
    OracleFailure {
        role: Role,
        #[source]
        source: OracleError,
    },

    #[error("judging failure: {reason}")]
    JudgingFailure { reason: String },

    #[error("{node} step timed out after {after:?}")]
    Timeout { node: NodeId, after: Duration },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl DebateError {
    /// Short machine-readable code for logs and exit reporting.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION",
            Self::OracleFailure { .. } => "ORACLE_FAILURE",
            Self::JudgingFailure { .. } => "JUDGING_FAILURE",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Transition(_) => "TRANSITION",
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
