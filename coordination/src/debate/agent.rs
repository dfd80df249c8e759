//! Debater node — one component for both sides, driven by [`AgentConfig`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::DebateError;
use super::prompts;
use super::state::{DebateState, DebateUpdate, Message, Role, Side};
use crate::oracle::{SharedOracle, TextRequest};

/// How a debater frames its statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhetoricalMode {
    /// Put forward the side's own claim.
    Assertion,
    /// Answer and dismantle the opponent's claim.
    Rebuttal,
}

impl RhetoricalMode {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Assertion => "argue",
            Self::Rebuttal => "rebut",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Self::Assertion => "argument",
            Self::Rebuttal => "rebuttal",
        }
    }
}

/// Per-side configuration for [`AgentNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub side: Side,
    pub mode: RhetoricalMode,
    /// Whether this side opens a new round when it speaks.
    /// Exactly one of the two debaters carries it.
    pub increments_round: bool,
}

impl AgentConfig {
    /// The affirmative side: opens each round.
    pub fn affirmative() -> Self {
        Self {
            side: Side::For,
            mode: RhetoricalMode::Assertion,
            increments_round: true,
        }
    }

    /// The negative side: answers within the round the affirmative opened.
    pub fn negative() -> Self {
        Self {
            side: Side::Against,
            mode: RhetoricalMode::Rebuttal,
            increments_round: false,
        }
    }

    pub fn role(&self) -> Role {
        self.side.role()
    }
}

/// A debater. Reads the state, makes one oracle call, returns one message.
pub struct AgentNode {
    config: AgentConfig,
    oracle: SharedOracle,
    model: String,
    max_tokens: u32,
}

impl AgentNode {
    pub fn new(
        config: AgentConfig,
        oracle: SharedOracle,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            config,
            oracle,
            model: model.into(),
            max_tokens,
        }
    }

    /// Build the oracle request for the current state.
    ///
    /// An empty transcript asks for an opening statement; otherwise only the
    /// most recent message is quoted back.
    pub fn request(&self, state: &DebateState) -> TextRequest {
        let system = prompts::agent_system_prompt(state.topic(), self.config.side, self.config.mode);
        let user = match state.last_message() {
            Some(last) => prompts::reply_instruction(last),
            None => prompts::opening_instruction(self.config.side, self.config.mode),
        };
        TextRequest {
            system,
            user,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        }
    }

    /// Produce this side's next statement.
    pub async fn run(&self, state: &DebateState) -> Result<DebateUpdate, DebateError> {
        let role = self.config.role();
        let request = self.request(state);
        debug!(
            %role,
            model = %request.model,
            prompt_chars = request.system.len() + request.user.len(),
            "requesting statement"
        );

        let text = self
            .oracle
            .generate_text(request)
            .await
            .map_err(|source| DebateError::OracleFailure { role, source })?;

        let content = text.trim();
        if content.is_empty() {
            return Err(DebateError::OracleFailure {
                role,
                source: crate::oracle::OracleError::EmptyResponse,
            });
        }

        let turn = if self.config.increments_round {
            state.current_turn() + 1
        } else {
            state.current_turn()
        };

        info!(
            side = %self.config.side,
            round = turn,
            text = %content,
            "{} statement",
            self.config.side.label()
        );

        let update = DebateUpdate::message(Message::new(role, content, turn));
        Ok(if self.config.increments_round {
            update.with_turn(turn)
        } else {
            update
        })
    }
}
