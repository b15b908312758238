use crate::types::{Analysis, ExecutionResult, Fix, RiskLevel};
use crossterm::style::Stylize;
use std::io::Write;

// All triage chrome goes to stderr so the wrapped command's stdout stays
// clean for pipes.

pub fn print_analysis(analysis: &Analysis) {
    eprintln!();
    eprintln!("{}", "command failed".bold());
    eprintln!("  cause: {}", analysis.root_cause);
    eprintln!(
        "  type:  {} ({} confidence, {})",
        analysis.error_type.label(),
        analysis.confidence.label(),
        analysis.analysis_method.label()
    );
}

pub fn print_fixes(fixes: &[Fix]) {
    if fixes.is_empty() {
        return;
    }
    eprintln!();
    for (i, fix) in fixes.iter().enumerate() {
        let tag = match fix.risk_level {
            RiskLevel::Low => "low".green(),
            RiskLevel::Medium => "medium".yellow(),
        };
        eprintln!("  {}. {}  [{}]", i + 1, fix.command.as_str().bold(), tag);
        eprintln!("     {}", fix.explanation);
    }
}

// Expanded listing for --explain: include why each fix was suggested and
// how strong its originating match was.
pub fn print_fixes_detailed(fixes: &[Fix]) {
    if fixes.is_empty() {
        print_no_fix();
        return;
    }
    eprintln!();
    for (i, fix) in fixes.iter().enumerate() {
        let tag = match fix.risk_level {
            RiskLevel::Low => "low".green(),
            RiskLevel::Medium => "medium".yellow(),
        };
        eprintln!("  {}. {}  [{}]", i + 1, fix.command.as_str().bold(), tag);
        eprintln!("     {}", fix.explanation);
        eprintln!(
            "     because: {} (match confidence {:.2})",
            fix.reasoning, fix.confidence
        );
    }
}

pub fn print_reasoning(reasoning: &str) {
    eprintln!("  model: {}", reasoning);
}

pub fn print_no_fix() {
    eprintln!();
    eprintln!("  no fix available");
}

pub fn print_prompt(fix_count: usize) {
    if fix_count == 1 {
        eprint!("run fix [1], or press enter to skip: ");
    } else {
        eprint!("run fix [1-{}], or press enter to skip: ", fix_count);
    }
    std::io::stderr().flush().ok();
}

pub fn print_reprompt(fix_count: usize) {
    eprintln!(
        "enter a number between 1 and {}, or press enter to skip",
        fix_count
    );
}

pub fn print_fix_outcome(result: &ExecutionResult) {
    eprintln!();
    if result.exit_code == 0 {
        eprintln!("{}", "fix succeeded".green());
    } else {
        eprintln!(
            "{}",
            format!("fix failed with exit code {}", result.exit_code).yellow()
        );
    }
}

pub fn print_thinking() {
    eprint!("analyzing...");
    std::io::stderr().flush().ok();
}

pub fn clear_thinking() {
    eprint!("\r            \r");
    std::io::stderr().flush().ok();
}
