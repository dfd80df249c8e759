//! Command-line surface: flags, interactive prompting, and input validation.

use anyhow::Result;
use clap::Parser;

use coordination::debate::{ConfigError, DebateInit};

/// Rounds used when the turn count is prompted for and left blank or invalid.
pub const DEFAULT_TURNS: u32 = 10;

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(
    name = "bilogic",
    version,
    about = "AI debate system: two agents argue a topic, a judge picks the winner",
    after_help = "Examples:\n  bilogic --topic \"Remote work improves productivity\"\n  bilogic -t \"Economic growth and environmental protection can coexist\" -n 5"
)]
pub struct Args {
    /// Debate topic (prompted for when omitted)
    #[arg(short = 't', long)]
    pub topic: Option<String>,

    /// Number of debate rounds, a positive integer (prompted for when omitted, default 10)
    #[arg(short = 'n', long)]
    pub turns: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,
}

/// Source of interactive answers.
pub trait Prompter {
    /// Ask `question` and return the trimmed answer (possibly empty).
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Prompter backed by the terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        let answer: String = dialoguer::Input::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_string())
    }
}

/// Parse a turn count given on the command line.
pub fn parse_turns(input: &str) -> Result<u32, ConfigError> {
    match input.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::NonPositiveTurns),
        Ok(turns) => Ok(turns),
        Err(_) => Err(ConfigError::InvalidTurns {
            input: input.to_string(),
        }),
    }
}

/// Turn flags and prompts into validated run inputs.
///
/// - a missing or blank `--topic` is prompted for; a blank answer is an error
/// - an invalid `--turns` is an error
/// - a missing `--turns` is prompted for; blank or invalid answers use [`DEFAULT_TURNS`]
pub fn resolve_inputs(args: &Args, prompter: &mut dyn Prompter) -> Result<DebateInit> {
    let topic = match args.topic.as_deref().map(str::trim) {
        Some(topic) if !topic.is_empty() => topic.to_string(),
        _ => prompter.ask("Debate topic")?,
    };
    if topic.is_empty() {
        return Err(ConfigError::EmptyTopic.into());
    }

    let max_turns = match &args.turns {
        Some(raw) => parse_turns(raw)?,
        None => {
            let answer = prompter.ask(&format!("Number of rounds (default: {DEFAULT_TURNS})"))?;
            parse_turns(&answer).unwrap_or(DEFAULT_TURNS)
        }
    };

    let init = DebateInit::new(topic, max_turns);
    init.validate()?;
    Ok(init)
}
