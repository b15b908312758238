use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stderr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvironmentInfo {
    pub shell: Option<String>,
    pub os: Option<String>,
    pub python_version: Option<String>,
    pub node_version: Option<String>,
    pub docker_version: Option<String>,
    pub git_version: Option<String>,
}

// Snapshot of a failed invocation. Built once, read everywhere, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureContext {
    pub command: String,
    pub exit_code: i32,
    pub stderr: String,
    pub cwd: String,
    pub history: Vec<String>,
    pub environment: EnvironmentInfo,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    PermissionDenied,
    CommandNotFound,
    MissingDependency,
    SyntaxError,
    NetworkError,
    FileNotFound,
    ConfigurationError,
    Unknown,
}

impl ErrorType {
    pub fn parse(s: &str) -> Option<ErrorType> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "permissiondenied" => Some(ErrorType::PermissionDenied),
            "commandnotfound" => Some(ErrorType::CommandNotFound),
            "missingdependency" => Some(ErrorType::MissingDependency),
            "syntaxerror" => Some(ErrorType::SyntaxError),
            "networkerror" => Some(ErrorType::NetworkError),
            "filenotfound" => Some(ErrorType::FileNotFound),
            "configurationerror" => Some(ErrorType::ConfigurationError),
            "unknown" => Some(ErrorType::Unknown),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ErrorType::PermissionDenied => "a file or command lacks the required permissions",
            ErrorType::CommandNotFound => "the command is not installed or not on PATH",
            ErrorType::MissingDependency => "a required module or dependency is missing",
            ErrorType::SyntaxError => "the command or script contains a syntax error",
            ErrorType::NetworkError => "a network connection could not be established",
            ErrorType::FileNotFound => "a referenced file or directory does not exist",
            ErrorType::ConfigurationError => "the environment or tool is not configured",
            ErrorType::Unknown => "cause undetermined from available output",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorType::PermissionDenied => "permission denied",
            ErrorType::CommandNotFound => "command not found",
            ErrorType::MissingDependency => "missing dependency",
            ErrorType::SyntaxError => "syntax error",
            ErrorType::NetworkError => "network error",
            ErrorType::FileNotFound => "file not found",
            ErrorType::ConfigurationError => "configuration error",
            ErrorType::Unknown => "unknown",
        }
    }
}

// Ordering matters: classification may only move risk upward via max().
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
}

impl RiskLevel {
    pub fn parse(s: &str) -> Option<RiskLevel> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
        }
    }
}

// A fix candidate after placeholder substitution, before risk classification.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFix {
    pub command: String,
    pub explanation: String,
    pub declared_risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub pattern_id: String,
    pub error_type: ErrorType,
    pub confidence: f64,
    pub explanation: String,
    pub candidate_fixes: Vec<CandidateFix>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiAnalysis {
    pub root_cause: String,
    pub error_type: ErrorType,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_score(score: f64) -> Confidence {
        if score >= 0.8 {
            Confidence::High
        } else if score >= 0.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Medium => 0.8,
            Confidence::Low => 0.6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMethod {
    Heuristic,
    Ai,
    Hybrid,
}

impl AnalysisMethod {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMethod::Heuristic => "heuristic",
            AnalysisMethod::Ai => "ai",
            AnalysisMethod::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub root_cause: String,
    pub error_type: ErrorType,
    pub confidence: Confidence,
    pub analysis_method: AnalysisMethod,
    pub raw_patterns: Vec<PatternMatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub command: String,
    pub explanation: String,
    pub risk_level: RiskLevel,
    pub reasoning: String,
    pub confidence: f64,
}
