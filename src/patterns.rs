use crate::types::{ErrorType, RiskLevel};
use regex::Regex;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone)]
pub struct FixTemplate {
    pub command_template: String,
    pub explanation: String,
    pub declared_risk: RiskLevel,
}

#[derive(Debug)]
pub struct PatternRule {
    pub id: String,
    pub error_type: ErrorType,
    pub regex: Regex,
    pub base_confidence: f64,
    pub fix_templates: Vec<FixTemplate>,
}

// Declaration order is the tie-break order for equal-confidence matches,
// so the table is a plain ordered Vec. Immutable after load.
#[derive(Debug)]
pub struct PatternTable {
    pub rules: Vec<PatternRule>,
}

fn rule(
    id: &str,
    error_type: ErrorType,
    pattern: &str,
    base_confidence: f64,
    fixes: &[(&str, &str, RiskLevel)],
) -> Result<PatternRule, Box<dyn std::error::Error>> {
    Ok(PatternRule {
        id: id.to_string(),
        error_type,
        regex: Regex::new(pattern)?,
        base_confidence,
        fix_templates: fixes
            .iter()
            .map(|(cmd, why, risk)| FixTemplate {
                command_template: cmd.to_string(),
                explanation: why.to_string(),
                declared_risk: *risk,
            })
            .collect(),
    })
}

pub fn builtin_rules() -> Result<Vec<PatternRule>, Box<dyn std::error::Error>> {
    Ok(vec![
        rule(
            "permission-denied-file",
            ErrorType::PermissionDenied,
            r"(?i)(?:bash: |sh: |zsh: )?(?P<file>[^\s:]+): permission denied",
            0.95,
            &[
                (
                    "chmod +x {target_file}",
                    "make the file executable",
                    RiskLevel::Low,
                ),
                (
                    "sudo {original_command}",
                    "re-run with elevated privileges",
                    RiskLevel::Medium,
                ),
            ],
        )?,
        rule(
            "permission-denied",
            ErrorType::PermissionDenied,
            r"(?i)permission denied|operation not permitted",
            0.9,
            &[(
                "sudo {original_command}",
                "re-run with elevated privileges",
                RiskLevel::Medium,
            )],
        )?,
        rule(
            "command-not-found",
            ErrorType::CommandNotFound,
            r"(?i)(?:bash: |sh: |zsh: )?(?P<command>[\w.+-]+): command not found",
            0.9,
            &[
                (
                    "sudo apt install {command_name}",
                    "install the missing command with apt",
                    RiskLevel::Medium,
                ),
                (
                    "brew install {command_name}",
                    "install the missing command with homebrew",
                    RiskLevel::Low,
                ),
            ],
        )?,
        rule(
            "python-module-missing",
            ErrorType::MissingDependency,
            r"(?i)(?:ModuleNotFoundError|ImportError): No module named '?(?P<module>[\w.]+)'?",
            0.95,
            &[
                (
                    "pip install {1}",
                    "install the missing python module",
                    RiskLevel::Low,
                ),
                (
                    "python3 -m pip install {1}",
                    "install the module for the python3 interpreter",
                    RiskLevel::Low,
                ),
            ],
        )?,
        rule(
            "node-module-missing",
            ErrorType::MissingDependency,
            r"(?i)Cannot find module '(?P<module>[^']+)'",
            0.95,
            &[(
                "npm install {1}",
                "install the missing node module",
                RiskLevel::Low,
            )],
        )?,
        rule(
            "syntax-error",
            ErrorType::SyntaxError,
            r"(?i)syntax error",
            0.85,
            // No safe mechanical fix for a syntax error; surface the cause only.
            &[],
        )?,
        rule(
            "network-unreachable",
            ErrorType::NetworkError,
            r"(?i)connection refused|connection timed out|could not resolve host|network is unreachable|temporary failure in name resolution",
            0.8,
            &[(
                "{original_command}",
                "retry once the network is reachable",
                RiskLevel::Low,
            )],
        )?,
        rule(
            "file-not-found-path",
            ErrorType::FileNotFound,
            r"(?i)(?:cannot access |cannot stat )?'?(?P<file>[^\s':]+)'?: no such file or directory",
            0.85,
            &[(
                "mkdir -p {target_file}",
                "create the missing path as a directory",
                RiskLevel::Medium,
            )],
        )?,
        rule(
            "file-not-found",
            ErrorType::FileNotFound,
            r"(?i)no such file or directory",
            0.75,
            &[(
                "ls -la {cwd}",
                "list the working directory to locate the file",
                RiskLevel::Low,
            )],
        )?,
        rule(
            "git-not-a-repo",
            ErrorType::ConfigurationError,
            r"(?i)not a git repository",
            0.9,
            &[(
                "git init",
                "initialize a git repository here",
                RiskLevel::Medium,
            )],
        )?,
        rule(
            "docker-daemon-down",
            ErrorType::ConfigurationError,
            r"(?i)cannot connect to the docker daemon",
            0.9,
            &[(
                "sudo systemctl start docker",
                "start the docker daemon",
                RiskLevel::Medium,
            )],
        )?,
        // Exit-code rules only ever see the synthesized "<cmd> exited with
        // code <n>" line, which the matcher builds when stderr is empty.
        rule(
            "exit-127",
            ErrorType::CommandNotFound,
            r"exited with code 127$",
            0.6,
            &[(
                "which {command_name}",
                "check whether the command exists on PATH",
                RiskLevel::Low,
            )],
        )?,
        rule(
            "exit-126",
            ErrorType::PermissionDenied,
            r"exited with code 126$",
            0.6,
            &[(
                "chmod +x {command_name}",
                "make the command executable",
                RiskLevel::Low,
            )],
        )?,
    ])
}

#[derive(Debug, Deserialize)]
struct RawPatternFile {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
    error_type: String,
    regex: String,
    confidence: f64,
    #[serde(default)]
    fixes: Vec<RawFix>,
}

#[derive(Debug, Deserialize)]
struct RawFix {
    command: String,
    explanation: String,
    risk: String,
}

fn validate_rule(raw: RawRule) -> Result<PatternRule, String> {
    let error_type = ErrorType::parse(&raw.error_type)
        .ok_or_else(|| format!("unknown error_type '{}'", raw.error_type))?;
    let regex = Regex::new(&raw.regex).map_err(|e| format!("bad regex: {}", e))?;
    if !(raw.confidence > 0.0 && raw.confidence <= 1.0) {
        return Err(format!("confidence {} out of (0, 1]", raw.confidence));
    }
    let mut fix_templates = Vec::new();
    for fix in raw.fixes {
        if fix.command.trim().is_empty() || fix.explanation.trim().is_empty() {
            return Err("fix with empty command or explanation".to_string());
        }
        let declared_risk =
            RiskLevel::parse(&fix.risk).ok_or_else(|| format!("unknown risk '{}'", fix.risk))?;
        fix_templates.push(FixTemplate {
            command_template: fix.command,
            explanation: fix.explanation,
            declared_risk,
        });
    }
    Ok(PatternRule {
        id: raw.id,
        error_type,
        regex,
        base_confidence: raw.confidence,
        fix_templates,
    })
}

// User rules append after the built-ins; an invalid rule is skipped with a
// warning, never fatal to the table.
pub fn load_user_rules(path: &Path) -> Vec<PatternRule> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let raw: RawPatternFile = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ai-run: ignoring pattern file: {}", e);
            return Vec::new();
        }
    };
    let mut rules = Vec::new();
    for raw_rule in raw.rules {
        let id = raw_rule.id.clone();
        match validate_rule(raw_rule) {
            Ok(rule) => rules.push(rule),
            Err(reason) => eprintln!("ai-run: skipping invalid pattern '{}': {}", id, reason),
        }
    }
    rules
}

pub fn load_table(user_path: &Path) -> Result<PatternTable, Box<dyn std::error::Error>> {
    let mut rules = builtin_rules()?;
    if user_path.exists() {
        rules.extend(load_user_rules(user_path));
    }
    Ok(PatternTable { rules })
}
