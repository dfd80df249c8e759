//! Console rendering of a debate run.
//!
//! Everything writes to a caller-supplied `Write` so the binary can target
//! stdout and tests can capture a buffer.

use std::io::{self, Write};

use coordination::debate::{DebateInit, DebateState, NodeId, Role, StepEvent};

/// Run header: title, topic and round budget.
pub fn write_banner(out: &mut impl Write, init: &DebateInit) -> io::Result<()> {
    writeln!(out, "=== Bilogic - AI debate ===")?;
    writeln!(out)?;
    writeln!(out, "Topic: {}", init.topic)?;
    writeln!(out, "Max turns: {}", init.max_turns)?;
    writeln!(out)
}

/// Progress line for one merged step.
///
/// Debater steps print the statement they just added. The judge step prints
/// its reasoning and winner.
pub fn write_step(out: &mut impl Write, event: &StepEvent<'_>) -> io::Result<()> {
    let state = event.state;
    match event.node {
        NodeId::AgentFor | NodeId::AgentAgainst => {
            let Some(message) = state.last_message() else {
                return Ok(());
            };
            if message.role == Role::AgentFor {
                writeln!(out, "--- Round {}/{} ---", message.turn, state.max_turns())?;
            }
            writeln!(out, "[{}] {}", message.role.label(), message.content)?;
            writeln!(out)
        }
        NodeId::Judge => {
            let Some(verdict) = state.verdict() else {
                return Ok(());
            };
            writeln!(out, "--- {} ---", Role::Judge.label())?;
            writeln!(out, "{}", verdict.reasoning)?;
            writeln!(out, "Decision: {}", verdict.winner.label())?;
            writeln!(out)
        }
    }
}

/// Closing block with the final outcome.
pub fn write_result(out: &mut impl Write, state: &DebateState) -> io::Result<()> {
    writeln!(out, "=== Debate finished ===")?;
    writeln!(out, "{}", state.status_line())?;
    match state.winner() {
        Some(side) => writeln!(out, "Winner: {} ({})", side.label(), side),
        None => writeln!(out, "Winner: undecided"),
    }
}
