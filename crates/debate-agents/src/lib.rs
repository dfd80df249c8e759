//! Runner crate for Bilogic debates: Anthropic oracle, env config, CLI and
//! console reporting around the `coordination` debate engine.

pub mod anthropic;
pub mod cli;
pub mod config;
pub mod report;
pub mod telemetry;
