use crate::config::Config;
use crate::history;
use crate::types::{EnvironmentInfo, ExecutionResult, FailureContext};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use std::env;

const PROBE_TIMEOUT_MS: u64 = 200;
const COLLECTION_TIMEOUT_MS: u64 = 2000;
const HISTORY_LIMIT: usize = 10;

// Runs strictly after the wrapped command has exited; collection can only
// degrade (missing fields), never fail or mutate anything.
pub fn collect(command: &str, result: &ExecutionResult, config: &Config) -> FailureContext {
    let deadline = Instant::now() + Duration::from_millis(COLLECTION_TIMEOUT_MS);

    let cwd = env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| ".".to_string());
    let history = if config.behavior.learning_mode {
        history::recent_commands(HISTORY_LIMIT)
    } else {
        Vec::new()
    };
    let environment = probe_environment(deadline);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    FailureContext {
        command: command.to_string(),
        exit_code: result.exit_code,
        stderr: result.stderr.clone(),
        cwd,
        history,
        environment,
        timestamp,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Python,
    Node,
    Docker,
    Git,
}

// All probes start together, each allowed 200ms; a probe that has not
// answered by its deadline (or the phase cap) is "unavailable", not an
// error. The straggler thread is abandoned, never joined.
fn probe_environment(phase_deadline: Instant) -> EnvironmentInfo {
    let probes: [(Probe, &str); 4] = [
        (Probe::Python, "python3"),
        (Probe::Node, "node"),
        (Probe::Docker, "docker"),
        (Probe::Git, "git"),
    ];

    let (tx, rx) = mpsc::channel();
    for (probe, program) in probes {
        let tx = tx.clone();
        let program = program.to_string();
        thread::spawn(move || {
            let _ = tx.send((probe, probe_version(&program)));
        });
    }
    drop(tx);

    let probe_deadline = Instant::now() + Duration::from_millis(PROBE_TIMEOUT_MS);
    let deadline = probe_deadline.min(phase_deadline);

    let mut info = EnvironmentInfo {
        shell: env::var("SHELL").ok(),
        os: Some(env::consts::OS.to_string()),
        ..EnvironmentInfo::default()
    };
    let mut received = 0;
    while received < probes.len() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match rx.recv_timeout(deadline - now) {
            Ok((probe, version)) => {
                received += 1;
                match probe {
                    Probe::Python => info.python_version = version,
                    Probe::Node => info.node_version = version,
                    Probe::Docker => info.docker_version = version,
                    Probe::Git => info.git_version = version,
                }
            }
            Err(_) => break,
        }
    }
    info
}

fn probe_version(program: &str) -> Option<String> {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    // python2 prints its version to stderr
    let text = if stdout.trim().is_empty() { stderr } else { stdout };
    text.lines()
        .next()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}
