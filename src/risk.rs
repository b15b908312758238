use crate::types::RiskLevel;
use regex::Regex;
use std::sync::OnceLock;

// Word-boundary aware so that e.g. "formatted" or "add" never trip the
// "format" / "dd" entries. Scanned against the final substituted command,
// not the template.
const DENYLIST: &[&str] = &[
    r"(?i)\bsudo\b",
    r"(?i)\brm\s+-[a-z]*r[a-z]*f",
    r"(?i)\brm\s+-[a-z]*f",
    r"(?i)\bdd\s+",
    r"(?i)\bmkfs\b",
    r"(?i)\bformat\b",
    r"(?i)\bchmod\s+-[a-z]*r",
    r"(?i)\bchown\s+-[a-z]*r",
    r">",
    r"(?i)\b(?:curl|wget)\b[^|]*\|\s*(?:ba|z|da)?sh\b",
    r"(?i)\bshred\b",
    r"(?i)\bfdisk\b",
];

fn denylist() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        DENYLIST
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    })
}

// Classification can only escalate a declared risk, never downgrade it.
pub fn classify(command: &str, declared_risk: RiskLevel) -> RiskLevel {
    for pattern in denylist() {
        if pattern.is_match(command) {
            return declared_risk.max(RiskLevel::Medium);
        }
    }
    declared_risk
}
