//! Debate Coordination Library
//!
//! This library provides:
//! - The shared debate state and its per-field reducers
//! - Debater and judge nodes that call an injected text-generation oracle
//! - The orchestrator that sequences nodes until the judge rules
//!
//! # Usage
//!
//! ```no_run
//! use coordination::debate::{DebateInit, DebateOrchestrator};
//! use coordination::oracle::SharedOracle;
//!
//! async fn debate(oracle: SharedOracle) -> Result<(), coordination::DebateError> {
//!     let orchestrator = DebateOrchestrator::new(oracle);
//!     let state = orchestrator
//!         .run(DebateInit::new("Remote work improves productivity", 3))
//!         .await?;
//!     println!("{}", state.status_line());
//!     Ok(())
//! }
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod debate;
pub mod oracle;

// Re-export key debate types
pub use debate::{
    ConfigError, DebateConfig, DebateError, DebateInit, DebateOrchestrator, DebateState,
    DebateUpdate, Message, Role, Side, Verdict,
};

// Re-export oracle contract
pub use oracle::{Oracle, OracleError, SharedOracle, StructuredRequest, TextRequest};
