//! Prompt templates for debaters and the judge.

use super::agent::RhetoricalMode;
use super::state::{Message, Side};

/// System instruction for a debater.
pub fn agent_system_prompt(topic: &str, side: Side, mode: RhetoricalMode) -> String {
    let stance = stance_phrase(side);
    let verb = mode.verb();
    format!(
        "You are a logical debater. Argue {stance} the following topic.

Topic: {topic}

Rules:
- Focus on a single point and {verb} concisely (2-4 sentences).
- Respond directly to your opponent's most recent statement.
- Avoid long speeches; keep the exchange conversational.
- Use at most one concrete example.

Speaking {stance} the topic, deliver one short, sharp {noun}.",
        noun = mode.noun(),
    )
}

/// User instruction for the opening statement.
pub fn opening_instruction(side: Side, mode: RhetoricalMode) -> String {
    format!(
        "This is the first statement of the debate. As the {} side, {} your position concisely (2-4 sentences).",
        side.label(),
        mode.verb()
    )
}

/// User instruction for a reply to the previous speaker.
pub fn reply_instruction(last: &Message) -> String {
    format!(
        "Your opponent said:\n{}: \"{}\"\n\nRespond to this statement concisely (2-4 sentences).",
        last.role.label(),
        last.content
    )
}

/// System instruction for the judge.
pub fn judge_system_prompt(topic: &str) -> String {
    format!(
        "You are a fair and objective judge. Evaluate the following debate.

Topic: {topic}

Your job:
- Evaluate both sides impartially.
- Weigh logical consistency.
- Assess the quality of evidence and examples.
- Consider how well each side handled rebuttals.
- Judge overall persuasiveness.

Produce:
1. reasoning: a concise explanation of your decision (roughly 300-500 characters)
   - weigh the strengths and weaknesses of both sides fairly
   - state clearly which side was stronger
2. winner: \"FOR\" (the {for_label} side) or \"AGAINST\" (the {against_label} side)

You must pick exactly one of \"FOR\" or \"AGAINST\".",
        for_label = Side::For.label(),
        against_label = Side::Against.label(),
    )
}

/// User instruction carrying the rendered transcript to the judge.
pub fn judge_instruction(transcript: &str) -> String {
    format!(
        "Evaluate the following debate and decide the winner.\n\n{transcript}\n\nState your verdict."
    )
}

fn stance_phrase(side: Side) -> &'static str {
    match side {
        Side::For => "in favour of",
        Side::Against => "against",
    }
}
