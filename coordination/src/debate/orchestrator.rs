//! Debate orchestrator — drives the affirmative→negative loop and the judge.
//!
//! Owns the node registry, the single conditional edge, and the canonical
//! [`DebateState`] for a run. Nodes execute strictly one at a time; each
//! update is merged before the next node sees the state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use super::agent::{AgentConfig, AgentNode};
use super::error::DebateError;
use super::judge::JudgeNode;
use super::state::{
    DebateInit, DebatePhase, DebateState, DebateTransition, DebateUpdate, NodeId,
};
use crate::oracle::SharedOracle;

/// Default model for debaters and judge.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Configuration for the debate orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Model used by both debaters.
    pub agent_model: String,
    /// Model used by the judge.
    pub judge_model: String,
    /// Token budget per debate statement.
    pub agent_max_tokens: u32,
    /// Token budget for the verdict.
    pub judge_max_tokens: u32,
    /// Upper bound on a single node step (None = unlimited).
    pub node_timeout: Option<Duration>,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            agent_model: DEFAULT_MODEL.to_string(),
            judge_model: DEFAULT_MODEL.to_string(),
            agent_max_tokens: 300,
            judge_max_tokens: 2048,
            node_timeout: None,
        }
    }
}

/// Where the conditional edge after the negative turn leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Start another round.
    AgentFor,
    /// Rounds exhausted; hand over to the judge.
    Judge,
}

impl Route {
    pub fn phase(self) -> DebatePhase {
        match self {
            Self::AgentFor => DebatePhase::AgentFor,
            Self::Judge => DebatePhase::Judge,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgentFor => write!(f, "agent_for"),
            Self::Judge => write!(f, "judge"),
        }
    }
}

/// Conditional edge evaluated after each negative turn.
pub fn should_continue(state: &DebateState) -> Route {
    if state.has_rounds_remaining() {
        Route::AgentFor
    } else {
        Route::Judge
    }
}

/// Snapshot handed to run observers after each merge.
#[derive(Debug, Clone, Copy)]
pub struct StepEvent<'a> {
    /// Node whose update was just merged.
    pub node: NodeId,
    /// State after the merge.
    pub state: &'a DebateState,
}

/// Result of a completed run, with the phase log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub state: DebateState,
    pub transitions: Vec<DebateTransition>,
}

impl RunReport {
    /// Number of node executions (every phase but start and end).
    pub fn steps(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.to.node().is_some())
            .count()
    }

    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        let winner = self
            .state
            .winner()
            .map(|w| w.label())
            .unwrap_or("undecided");
        format!(
            "[{}] {} rounds | {} messages | winner={}",
            self.run_id,
            self.state.current_turn(),
            self.state.history().len(),
            winner
        )
    }
}

/// The debate orchestrator.
///
/// Usage:
/// 1. Build an [`Oracle`](crate::oracle::Oracle) and wrap it in an `Arc`
/// 2. Create with `new()` or `with_config()`
/// 3. Call `run()` (or `run_observed()` to watch each merge)
pub struct DebateOrchestrator {
    config: DebateConfig,
    agent_for: AgentNode,
    agent_against: AgentNode,
    judge: JudgeNode,
}

impl DebateOrchestrator {
    /// Create a new orchestrator with default config.
    pub fn new(oracle: SharedOracle) -> Self {
        Self::with_config(oracle, DebateConfig::default())
    }

    /// Create a new orchestrator with custom config.
    pub fn with_config(oracle: SharedOracle, config: DebateConfig) -> Self {
        let agent_for = AgentNode::new(
            AgentConfig::affirmative(),
            oracle.clone(),
            config.agent_model.clone(),
            config.agent_max_tokens,
        );
        let agent_against = AgentNode::new(
            AgentConfig::negative(),
            oracle.clone(),
            config.agent_model.clone(),
            config.agent_max_tokens,
        );
        let judge = JudgeNode::new(oracle, config.judge_model.clone(), config.judge_max_tokens);
        Self {
            config,
            agent_for,
            agent_against,
            judge,
        }
    }

    /// Run a debate to its verdict.
    pub async fn run(&self, init: DebateInit) -> Result<DebateState, DebateError> {
        self.run_observed(init, |_| {}).await
    }

    /// Run a debate, calling `observer` after every merged update.
    pub async fn run_observed<F>(
        &self,
        init: DebateInit,
        observer: F,
    ) -> Result<DebateState, DebateError>
    where
        F: FnMut(&StepEvent<'_>),
    {
        self.run_with_report(init, observer)
            .await
            .map(|report| report.state)
    }

    /// Run a debate and return the final state together with the phase log.
    pub async fn run_with_report<F>(
        &self,
        init: DebateInit,
        mut observer: F,
    ) -> Result<RunReport, DebateError>
    where
        F: FnMut(&StepEvent<'_>),
    {
        let state = DebateState::new(init)?;
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "debate",
            run_id = %run_id,
            topic = %state.topic(),
            max_turns = state.max_turns()
        );

        async move {
            info!("debate started");
            let (state, transitions) = self.drive(state, &mut observer).await?;
            info!(
                rounds = state.current_turn(),
                messages = state.history().len(),
                winner = ?state.winner(),
                "debate finished"
            );
            Ok(RunReport {
                run_id,
                state,
                transitions,
            })
        }
        .instrument(span)
        .await
    }

    async fn drive<F>(
        &self,
        mut state: DebateState,
        observer: &mut F,
    ) -> Result<(DebateState, Vec<DebateTransition>), DebateError>
    where
        F: FnMut(&StepEvent<'_>),
    {
        let mut transitions = Vec::new();
        let mut phase = DebatePhase::Start;

        while !phase.is_terminal() {
            if let Some(node) = phase.node() {
                let update = self.step(node, &state).await?;
                state.apply(update);
                observer(&StepEvent {
                    node,
                    state: &state,
                });
            }

            let (next, reason) = Self::successor(phase, &state);
            transitions.push(DebateTransition::record(phase, next, reason)?);
            debug!(from = %phase, to = %next, reason, "transition");
            phase = next;
        }

        Ok((state, transitions))
    }

    /// Fixed topology plus the one conditional edge.
    fn successor(phase: DebatePhase, state: &DebateState) -> (DebatePhase, &'static str) {
        match phase {
            DebatePhase::Start => (DebatePhase::AgentFor, "debate started"),
            DebatePhase::AgentFor => (DebatePhase::AgentAgainst, "statement submitted"),
            DebatePhase::AgentAgainst => match should_continue(state) {
                Route::AgentFor => (Route::AgentFor.phase(), "rounds remaining"),
                Route::Judge => (Route::Judge.phase(), "max rounds reached"),
            },
            DebatePhase::Judge => (DebatePhase::End, "verdict recorded"),
            DebatePhase::End => (DebatePhase::End, "terminal"),
        }
    }

    /// Execute one node. A timed-out step yields no update at all.
    async fn step(&self, node: NodeId, state: &DebateState) -> Result<DebateUpdate, DebateError> {
        if node == NodeId::Judge {
            debug_assert!(state.current_turn() <= state.max_turns());
        }

        let work = async {
            match node {
                NodeId::AgentFor => self.agent_for.run(state).await,
                NodeId::AgentAgainst => self.agent_against.run(state).await,
                NodeId::Judge => self.judge.run(state).await,
            }
        };

        match self.config.node_timeout {
            Some(after) => tokio::time::timeout(after, work)
                .await
                .map_err(|_| DebateError::Timeout { node, after })?,
            None => work.await,
        }
    }
}
