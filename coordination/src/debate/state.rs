//! Debate state — roles, transcript, phases, and the shared state store.
//!
//! [`DebateState`] is the single aggregate threaded through a run. Nodes
//! never touch it mutably; they return a [`DebateUpdate`] and the engine
//! folds it in with [`DebateState::apply`], which owns the per-field
//! reducer rules.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{ConfigError, TransitionError};

/// Debating side. Serialized as `FOR` / `AGAINST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    // Plain comments: variant docs would turn the schema enum into a oneOf.
    For,
    Against,
}

impl Side {
    /// Transcript role this side speaks as.
    pub fn role(self) -> Role {
        match self {
            Self::For => Role::AgentFor,
            Self::Against => Role::AgentAgainst,
        }
    }

    /// Display label, shared with [`Role::label`].
    pub fn label(self) -> &'static str {
        self.role().label()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::For => write!(f, "for"),
            Self::Against => write!(f, "against"),
        }
    }
}

/// Speaker of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    AgentFor,
    AgentAgainst,
    Judge,
}

impl Role {
    /// Human-readable speaker name. Every component that prints a speaker
    /// goes through this mapping.
    pub fn label(self) -> &'static str {
        match self {
            Self::AgentFor => "Affirmative",
            Self::AgentAgainst => "Negative",
            Self::Judge => "Judge",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgentFor => write!(f, "agent_for"),
            Self::AgentAgainst => write!(f, "agent_against"),
            Self::Judge => write!(f, "judge"),
        }
    }
}

/// Participant node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    AgentFor,
    AgentAgainst,
    Judge,
}

impl NodeId {
    pub fn role(self) -> Role {
        match self {
            Self::AgentFor => Role::AgentFor,
            Self::AgentAgainst => Role::AgentAgainst,
            Self::Judge => Role::Judge,
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.role().fmt(f)
    }
}

/// One utterance in the transcript. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Round this message belongs to.
    pub turn: u32,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, turn: u32) -> Self {
        Self {
            role,
            content: content.into(),
            turn,
        }
    }

    /// `{label}: {content}` line used in transcripts.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}

/// Judge's decision. Winner and reasoning always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub winner: Side,
    pub reasoning: String,
}

/// Caller-supplied run inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateInit {
    pub topic: String,
    pub max_turns: u32,
}

impl DebateInit {
    pub fn new(topic: impl Into<String>, max_turns: u32) -> Self {
        Self {
            topic: topic.into(),
            max_turns,
        }
    }

    /// Reject inputs the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if self.max_turns == 0 {
            return Err(ConfigError::NonPositiveTurns);
        }
        Ok(())
    }
}

/// Partial update returned by a node.
///
/// Carries no topic or turn limit: both are fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebateUpdate {
    /// Messages to append to the transcript, in order.
    pub history: Vec<Message>,
    /// Replacement for the round counter.
    pub current_turn: Option<u32>,
    /// Replacement for the verdict.
    pub verdict: Option<Verdict>,
}

impl DebateUpdate {
    /// Update that appends a single message.
    pub fn message(message: Message) -> Self {
        Self {
            history: vec![message],
            ..Default::default()
        }
    }

    /// Update that records a verdict.
    pub fn verdict(verdict: Verdict) -> Self {
        Self {
            verdict: Some(verdict),
            ..Default::default()
        }
    }

    pub fn with_turn(mut self, turn: u32) -> Self {
        self.current_turn = Some(turn);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.current_turn.is_none() && self.verdict.is_none()
    }
}

/// The shared debate aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateState {
    topic: String,
    history: Vec<Message>,
    current_turn: u32,
    max_turns: u32,
    verdict: Option<Verdict>,
}

impl DebateState {
    /// Build the initial state. Everything but the topic and turn limit
    /// starts at its default.
    pub fn new(init: DebateInit) -> Result<Self, ConfigError> {
        init.validate()?;
        Ok(Self {
            topic: init.topic,
            history: Vec::new(),
            current_turn: 0,
            max_turns: init.max_turns,
            verdict: None,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Transcript in production order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Number of completed (or in-progress) rounds.
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn winner(&self) -> Option<Side> {
        self.verdict.as_ref().map(|v| v.winner)
    }

    pub fn judge_reasoning(&self) -> Option<&str> {
        self.verdict.as_ref().map(|v| v.reasoning.as_str())
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }

    /// Whether more rounds are available.
    pub fn has_rounds_remaining(&self) -> bool {
        self.current_turn < self.max_turns
    }

    /// Merge a partial update using the per-field reducers:
    ///
    /// - history: append, in order
    /// - current turn: replace if supplied
    /// - verdict: replace if supplied (written once by the judge)
    pub fn apply(&mut self, update: DebateUpdate) {
        let DebateUpdate {
            history,
            current_turn,
            verdict,
        } = update;

        self.history.extend(history);

        if let Some(turn) = current_turn {
            if turn < self.current_turn {
                warn!(
                    from = self.current_turn,
                    to = turn,
                    "round counter moved backwards"
                );
            }
            self.current_turn = turn;
        }

        if let Some(verdict) = verdict {
            if let Some(previous) = &self.verdict {
                if previous != &verdict {
                    warn!(
                        previous = %previous.winner,
                        new = %verdict.winner,
                        "verdict overwritten; the judge should only write once"
                    );
                }
            }
            self.verdict = Some(verdict);
        }
    }

    /// Consuming form of [`apply`](Self::apply).
    pub fn merged(mut self, update: DebateUpdate) -> Self {
        self.apply(update);
        self
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        let verdict = match &self.verdict {
            Some(v) => v.winner.label(),
            None => "pending",
        };
        format!(
            "round {}/{} | {} messages | verdict={}",
            self.current_turn,
            self.max_turns,
            self.history.len(),
            verdict
        )
    }
}

/// Render a transcript as `{label}: {content}` blocks separated by blank lines.
pub fn render_transcript(history: &[Message]) -> String {
    if history.is_empty() {
        return "No statements have been made yet.".to_string();
    }
    history
        .iter()
        .map(Message::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Phase of a debate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebatePhase {
    /// Run created, no node executed yet.
    Start,
    /// Affirmative agent is speaking.
    AgentFor,
    /// Negative agent is responding.
    AgentAgainst,
    /// Judge is evaluating the transcript.
    Judge,
    /// Verdict recorded; the run is over.
    End,
}

impl DebatePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [DebatePhase] {
        match self {
            Self::Start => &[Self::AgentFor],
            Self::AgentFor => &[Self::AgentAgainst],
            Self::AgentAgainst => &[Self::AgentFor, Self::Judge],
            Self::Judge => &[Self::End],
            Self::End => &[],
        }
    }

    /// Node that runs while in this phase.
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::AgentFor => Some(NodeId::AgentFor),
            Self::AgentAgainst => Some(NodeId::AgentAgainst),
            Self::Judge => Some(NodeId::Judge),
            Self::Start | Self::End => None,
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::AgentFor => write!(f, "agent_for"),
            Self::AgentAgainst => write!(f, "agent_against"),
            Self::Judge => write!(f, "judge"),
            Self::End => write!(f, "end"),
        }
    }
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateTransition {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

impl DebateTransition {
    /// Record `from → to`, rejecting edges the topology does not have.
    pub fn record(
        from: DebatePhase,
        to: DebatePhase,
        reason: &str,
    ) -> Result<Self, TransitionError> {
        if !from.valid_transitions().contains(&to) {
            return Err(TransitionError {
                from,
                to,
                reason: format!(
                    "not a valid transition (allowed: {:?})",
                    from.valid_transitions()
                ),
            });
        }
        Ok(Self {
            from,
            to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        })
    }
}
