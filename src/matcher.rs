use crate::patterns::{PatternRule, PatternTable};
use crate::types::{CandidateFix, ErrorType, FailureContext, PatternMatch, RiskLevel};
use regex::{Captures, Regex};
use std::cmp::Ordering;
use std::sync::OnceLock;

pub const UNKNOWN_PATTERN_ID: &str = "unknown";
pub const UNKNOWN_CONFIDENCE: f64 = 0.1;

// Pure and deterministic: same context + table always yields the same
// matches in the same order. No I/O here.
pub fn match_failure(context: &FailureContext, table: &PatternTable) -> Vec<PatternMatch> {
    let haystack = if context.stderr.trim().is_empty() {
        format!("{} exited with code {}", context.command, context.exit_code)
    } else {
        context.stderr.clone()
    };

    let mut matches: Vec<PatternMatch> = Vec::new();
    for rule in &table.rules {
        if let Some(caps) = rule.regex.captures(&haystack) {
            matches.push(PatternMatch {
                pattern_id: rule.id.clone(),
                error_type: rule.error_type,
                confidence: rule.base_confidence,
                explanation: rule.error_type.describe().to_string(),
                candidate_fixes: substitute_fixes(rule, &caps, context),
            });
        }
    }

    if matches.is_empty() {
        matches.push(unknown_match(context));
    }

    // Stable sort: equal confidence keeps declaration order.
    matches.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    matches
}

fn unknown_match(context: &FailureContext) -> PatternMatch {
    PatternMatch {
        pattern_id: UNKNOWN_PATTERN_ID.to_string(),
        error_type: ErrorType::Unknown,
        confidence: UNKNOWN_CONFIDENCE,
        explanation: ErrorType::Unknown.describe().to_string(),
        candidate_fixes: vec![CandidateFix {
            command: context.command.clone(),
            explanation: "retry the command".to_string(),
            declared_risk: RiskLevel::Low,
        }],
    }
}

fn substitute_fixes(
    rule: &PatternRule,
    caps: &Captures,
    context: &FailureContext,
) -> Vec<CandidateFix> {
    rule.fix_templates
        .iter()
        .filter_map(|template| {
            substitute(&template.command_template, caps, context).map(|command| CandidateFix {
                command,
                explanation: template.explanation.clone(),
                declared_risk: template.declared_risk,
            })
        })
        .collect()
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{([a-z0-9_]+)\}").unwrap_or_else(|_| Regex::new("$^").unwrap())
    })
}

// A template whose placeholder cannot be resolved is dropped for this
// match rather than emitted with a literal brace in it.
fn substitute(template: &str, caps: &Captures, context: &FailureContext) -> Option<String> {
    let mut out = String::new();
    let mut last = 0;
    for found in placeholder_regex().captures_iter(template) {
        let whole = found.get(0)?;
        let name = found.get(1)?.as_str();
        out.push_str(&template[last..whole.start()]);
        out.push_str(&resolve(name, caps, context)?);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    let out = out.trim().to_string();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn resolve(name: &str, caps: &Captures, context: &FailureContext) -> Option<String> {
    match name {
        "original_command" => Some(context.command.clone()),
        "cwd" => Some(context.cwd.clone()),
        "target_file" => caps.name("file").map(|m| m.as_str().to_string()),
        "command_name" => caps
            .name("command")
            .map(|m| m.as_str().to_string())
            .or_else(|| {
                context
                    .command
                    .split_whitespace()
                    .next()
                    .map(String::from)
            }),
        _ => name
            .parse::<usize>()
            .ok()
            .and_then(|n| caps.get(n))
            .map(|m| m.as_str().to_string()),
    }
}
