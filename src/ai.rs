use crate::config::{AiConfig, Config};
use crate::types::{AiAnalysis, ErrorType, FailureContext};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const AI_TIMEOUT_SECS: u64 = 10;

#[derive(Serialize)]
struct OllamaGenerate {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

// The failure facts shipped to the model, mirroring FailureContext.
#[derive(Serialize)]
struct FailureReport<'a> {
    command: &'a str,
    exit_code: i32,
    stderr: &'a str,
    cwd: &'a str,
    history: &'a [String],
    environment: &'a crate::types::EnvironmentInfo,
}

pub struct AiClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(AI_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: config.endpoint.clone(),
            model: config.model.clone(),
            client,
        })
    }

    fn generate(&self, prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerate {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };
        let resp = self.client.post(&url).json(&body).send()?;
        if !resp.status().is_success() {
            return Err(format!("model endpoint returned {}", resp.status()).into());
        }
        let resp: OllamaGenerateResponse = resp.json()?;
        Ok(resp.response)
    }

    pub fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        self.client.get(&url).send().is_ok()
    }

    // Every failure mode collapses to None; the caller falls back to the
    // heuristic baseline and never sees an error from here.
    pub fn analyze(&self, context: &FailureContext) -> Option<AiAnalysis> {
        let prompt = build_prompt(context)?;
        let response = self.generate(&prompt).ok()?;
        parse_analysis(&response)
    }
}

fn build_prompt(context: &FailureContext) -> Option<String> {
    let report = FailureReport {
        command: &context.command,
        exit_code: context.exit_code,
        stderr: &context.stderr,
        cwd: &context.cwd,
        history: &context.history,
        environment: &context.environment,
    };
    let report_json = serde_json::to_string_pretty(&report).ok()?;

    Some(format!(
        r#"You are a shell failure analyst. You ONLY output JSON. No explanations. No markdown. No text before or after the JSON.

A shell command failed. The failure facts:
{report_json}

Diagnose the root cause. error_type must be one of: permission_denied, command_not_found, missing_dependency, syntax_error, network_error, file_not_found, configuration_error, unknown. confidence is a number between 0 and 1.

Respond with ONLY this JSON structure, nothing else:
{{"root_cause":"one sentence","error_type":"unknown","confidence":0.5,"reasoning":"one sentence"}}"#
    ))
}

fn parse_analysis(response: &str) -> Option<AiAnalysis> {
    let response = response.trim();
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }

    let parsed: serde_json::Value = serde_json::from_str(&response[start..=end]).ok()?;

    let root_cause = parsed["root_cause"].as_str()?.trim().to_string();
    if root_cause.is_empty() {
        return None;
    }
    let error_type = parsed["error_type"]
        .as_str()
        .and_then(ErrorType::parse)
        .unwrap_or(ErrorType::Unknown);
    let confidence = parsed["confidence"].as_f64()?.clamp(0.0, 1.0);
    let reasoning = parsed["reasoning"].as_str().unwrap_or("").to_string();

    Some(AiAnalysis {
        root_cause,
        error_type,
        confidence,
        reasoning,
    })
}

// Kick the analysis off on its own thread so it overlaps with heuristic
// matching. None when disabled; the receiver is bounded by wait_analysis.
pub fn spawn_analysis(
    config: &Config,
    context: &FailureContext,
) -> Option<mpsc::Receiver<Option<AiAnalysis>>> {
    if !config.ai.enabled {
        return None;
    }
    let client = AiClient::new(&config.ai).ok()?;
    let context = context.clone();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(client.analyze(&context));
    });
    Some(rx)
}

// A timeout abandons the in-flight call; whatever it later produces is
// dropped with the channel.
pub fn wait_analysis(rx: Option<mpsc::Receiver<Option<AiAnalysis>>>) -> Option<AiAnalysis> {
    rx?.recv_timeout(Duration::from_secs(AI_TIMEOUT_SECS))
        .ok()
        .flatten()
}
