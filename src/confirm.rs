use crate::types::Fix;
use crate::ui;
use std::io::BufRead;

// Confirmation is an explicit state machine, not a scattered flag check:
// Executing is constructed in exactly one place, the Validating arm, and
// only for a numeric selection inside [1, fixes.len()]. That makes "never
// execute without explicit approval" a reachability property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Presenting,
    AwaitingInput,
    Validating(String),
    Executing(usize),
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    ExecuteFix(usize),
    Reject,
}

// Empty input rejects; a valid index selects; anything else re-prompts.
// Invalid input never defaults to either extreme.
pub fn validate(input: &str, fix_count: usize) -> State {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return State::Rejected;
    }
    match trimmed.parse::<usize>() {
        Ok(n) if n >= 1 && n <= fix_count => State::Executing(n - 1),
        _ => State::AwaitingInput,
    }
}

// Drives the machine against one input source until a terminal state.
// Produces exactly one Decision; with no fixes there is nothing to
// confirm, so the user is told and the original failure stands.
pub fn decide(fixes: &[Fix], input: &mut dyn BufRead) -> Result<Decision, Box<dyn std::error::Error>> {
    let mut state = State::Presenting;
    let mut prompted = false;
    loop {
        state = match state {
            State::Presenting => {
                ui::print_fixes(fixes);
                if fixes.is_empty() {
                    ui::print_no_fix();
                    return Ok(Decision::Reject);
                }
                State::AwaitingInput
            }
            State::AwaitingInput => {
                if prompted {
                    ui::print_reprompt(fixes.len());
                }
                ui::print_prompt(fixes.len());
                prompted = true;
                let mut line = String::new();
                let read = input.read_line(&mut line)?;
                if read == 0 {
                    // stdin closed: same as declining
                    State::Rejected
                } else {
                    State::Validating(line)
                }
            }
            State::Validating(line) => validate(&line, fixes.len()),
            State::Executing(index) => return Ok(Decision::ExecuteFix(index)),
            State::Rejected => return Ok(Decision::Reject),
        };
    }
}
