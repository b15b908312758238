use crate::types::ExecutionResult;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

// Run a command through the shell with stdout/stdin passed straight
// through; stderr is teed so the user still sees it live while a copy is
// kept for analysis.
pub fn run_shell(command: &str) -> Result<ExecutionResult, Box<dyn std::error::Error>> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stderr = String::new();
    if let Some(pipe) = child.stderr.take() {
        for line in BufReader::new(pipe).lines() {
            let line = line?;
            eprintln!("{}", line);
            stderr.push_str(&line);
            stderr.push('\n');
        }
    }

    let status = child.wait()?;
    Ok(ExecutionResult {
        // a signal death has no code; report generic failure
        exit_code: status.code().unwrap_or(1),
        stderr,
    })
}
