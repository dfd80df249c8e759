use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use coordination::debate::DebateOrchestrator;
use debate_agents::anthropic::AnthropicOracle;
use debate_agents::cli::{resolve_inputs, Args, TerminalPrompter};
use debate_agents::config::BilogicConfig;
use debate_agents::report;
use debate_agents::telemetry::{init_tracing, MetricsRecorder};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.json_logs);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "bilogic failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = BilogicConfig::from_env().context("loading configuration")?;
    let init = resolve_inputs(&args, &mut TerminalPrompter)?;

    info!(
        base_url = %config.endpoint.base_url,
        agent_model = %config.agent_model,
        judge_model = %config.judge_model,
        "bilogic starting"
    );

    let oracle = AnthropicOracle::new(config.endpoint.clone())?;
    let orchestrator = DebateOrchestrator::with_config(Arc::new(oracle), config.debate_config());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_banner(&mut out, &init)?;
    out.flush()?;

    let mut metrics = MetricsRecorder::start();
    let mut write_failure = None;
    let run_report = orchestrator
        .run_with_report(init, |event| {
            metrics.record(event);
            if write_failure.is_none() {
                write_failure = report::write_step(&mut out, event)
                    .and_then(|()| out.flush())
                    .err();
            }
        })
        .await
        .context("debate run failed")?;
    if let Some(e) = write_failure {
        return Err(e).context("writing transcript");
    }

    metrics.finish(&run_report.state).emit(args.json_logs);
    info!(
        summary = %run_report.summary_line(),
        steps = run_report.steps(),
        "run complete"
    );
    report::write_result(&mut out, &run_report.state)?;
    Ok(())
}
