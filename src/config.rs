use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const APP_NAME: &str = "ai-run";
const DEFAULT_MODEL: &str = "llama3.1";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

pub const MAX_FIXES_CAP: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub confidence_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    pub max_fixes: usize,
    pub learning_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ai: AiConfig,
    pub behavior: BehaviorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai: AiConfig {
                enabled: true,
                endpoint: DEFAULT_OLLAMA_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            },
            behavior: BehaviorConfig {
                max_fixes: MAX_FIXES_CAP,
                learning_mode: false,
            },
        }
    }
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("config.toml")
}

pub fn get_patterns_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("patterns.toml")
}

pub fn load_config() -> Config {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Config {
    if path.exists() {
        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => return sanitize(config),
                Err(e) => eprintln!("ai-run: invalid config, using defaults: {}", e),
            }
        }
    }
    Config::default()
}

// Out-of-range values fall back to the documented defaults instead of
// failing the run.
fn sanitize(mut config: Config) -> Config {
    if !(config.ai.confidence_threshold > 0.0 && config.ai.confidence_threshold <= 1.0) {
        eprintln!(
            "ai-run: confidence_threshold {} out of range, using {}",
            config.ai.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD
        );
        config.ai.confidence_threshold = DEFAULT_CONFIDENCE_THRESHOLD;
    }
    if config.behavior.max_fixes == 0 || config.behavior.max_fixes > MAX_FIXES_CAP {
        eprintln!(
            "ai-run: max_fixes {} out of range, using {}",
            config.behavior.max_fixes, MAX_FIXES_CAP
        );
        config.behavior.max_fixes = MAX_FIXES_CAP;
    }
    config
}

pub fn save_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = get_config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
