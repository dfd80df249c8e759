//! Structured telemetry for debate runs.
//!
//! Two pieces:
//! - subscriber setup (`RUST_LOG` aware, optional JSON output on stderr)
//! - per-run step timings, collected from orchestrator step events and
//!   emitted as a single summary event when the run ends

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use coordination::debate::{DebateState, NodeId, StepEvent};

/// Install the global subscriber. Logs go to stderr so stdout carries
/// only the transcript.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {e}");
    }
}

/// Timing of one orchestrator step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTiming {
    pub node: NodeId,
    /// Round the state was in after the step.
    pub round: u32,
    pub elapsed_ms: u64,
}

/// Aggregate metrics for one debate run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetrics {
    pub steps: Vec<StepTiming>,
    pub total_ms: u64,
    pub rounds: u32,
    pub messages: usize,
    pub transcript_chars: usize,
}

/// Collects [`StepTiming`]s from step events.
pub struct MetricsRecorder {
    started: Instant,
    last: Instant,
    steps: Vec<StepTiming>,
}

impl MetricsRecorder {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last: now,
            steps: Vec::new(),
        }
    }

    /// Record the step that just completed.
    pub fn record(&mut self, event: &StepEvent<'_>) {
        let now = Instant::now();
        self.steps.push(StepTiming {
            node: event.node,
            round: event.state.current_turn(),
            elapsed_ms: duration_ms(now.duration_since(self.last)),
        });
        self.last = now;
    }

    /// Close the run.
    pub fn finish(self, state: &DebateState) -> RunMetrics {
        RunMetrics {
            total_ms: duration_ms(self.started.elapsed()),
            rounds: state.current_turn(),
            messages: state.history().len(),
            transcript_chars: state.history().iter().map(|m| m.content.len()).sum(),
            steps: self.steps,
        }
    }
}

impl RunMetrics {
    /// Slowest step of the run, if any step completed.
    pub fn slowest(&self) -> Option<&StepTiming> {
        self.steps.iter().max_by_key(|s| s.elapsed_ms)
    }

    /// Per-step timings as a JSON array.
    pub fn steps_json(&self) -> String {
        serde_json::to_string(&self.steps).unwrap_or_else(|_| "[]".to_string())
    }

    /// Emit the summary event. `detailed` attaches every step timing,
    /// which is what JSON log consumers want.
    pub fn emit(&self, detailed: bool) {
        let slowest = self.slowest();
        let steps = detailed.then(|| self.steps_json());
        info!(
            total_ms = self.total_ms,
            rounds = self.rounds,
            messages = self.messages,
            transcript_chars = self.transcript_chars,
            slowest_node = ?slowest.map(|s| s.node),
            slowest_ms = slowest.map(|s| s.elapsed_ms).unwrap_or(0),
            steps = steps.as_deref(),
            "run metrics"
        );
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use coordination::debate::{DebateInit, DebateUpdate, Message, Role};

    use super::*;

    #[test]
    fn test_recorder_collects_steps() {
        let state = DebateState::new(DebateInit::new("X", 1))
            .unwrap()
            .merged(DebateUpdate::message(Message::new(Role::AgentFor, "abc", 1)).with_turn(1));

        let mut recorder = MetricsRecorder::start();
        recorder.record(&StepEvent {
            node: NodeId::AgentFor,
            state: &state,
        });

        let metrics = recorder.finish(&state);
        assert_eq!(metrics.rounds, 1);
        assert_eq!(metrics.messages, 1);
        assert_eq!(metrics.transcript_chars, 3);
        assert_eq!(metrics.steps.len(), 1);
        assert_eq!(metrics.steps[0].node, NodeId::AgentFor);
        assert_eq!(metrics.steps[0].round, 1);
    }

    #[test]
    fn test_metrics_serialize() {
        let metrics = RunMetrics {
            steps: vec![StepTiming {
                node: NodeId::Judge,
                round: 2,
                elapsed_ms: 40,
            }],
            total_ms: 100,
            rounds: 2,
            messages: 4,
            transcript_chars: 200,
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["steps"][0]["node"], "judge");
        assert_eq!(json["total_ms"], 100);

        let steps: serde_json::Value = serde_json::from_str(&metrics.steps_json()).unwrap();
        assert_eq!(steps[0]["elapsed_ms"], 40);
        assert_eq!(steps[0]["round"], 2);
    }

    #[test]
    fn test_slowest_step() {
        let timing = |node, elapsed_ms| StepTiming {
            node,
            round: 1,
            elapsed_ms,
        };
        let metrics = RunMetrics {
            steps: vec![
                timing(NodeId::AgentFor, 30),
                timing(NodeId::AgentAgainst, 90),
                timing(NodeId::Judge, 60),
            ],
            total_ms: 180,
            rounds: 1,
            messages: 2,
            transcript_chars: 10,
        };
        assert_eq!(metrics.slowest().map(|s| s.node), Some(NodeId::AgentAgainst));

        let empty = RunMetrics {
            steps: Vec::new(),
            ..metrics
        };
        assert!(empty.slowest().is_none());
        assert_eq!(empty.steps_json(), "[]");
    }

    #[test]
    fn test_duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_ms(Duration::from_micros(999)), 0);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }
}
