use crate::config::MAX_FIXES_CAP;
use crate::risk;
use crate::types::{Analysis, Fix, PatternMatch, RiskLevel};
use std::cmp::Ordering;
use std::collections::HashSet;

fn risk_penalty(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 0.0,
        RiskLevel::Medium => 0.1,
    }
}

// Materialize, dedup, score, truncate. The candidate walk is ordered by
// (confidence desc, pattern_id) rather than the incoming list order, so the
// output is identical for any permutation of the same raw_patterns multiset.
pub fn rank(analysis: &Analysis, max_fixes: usize) -> Vec<Fix> {
    let weight = analysis.confidence.weight();

    let mut patterns: Vec<&PatternMatch> = analysis.raw_patterns.iter().collect();
    patterns.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.pattern_id.cmp(&b.pattern_id))
    });

    let mut seen: HashSet<&str> = HashSet::new();
    let mut scored: Vec<(f64, Fix)> = Vec::new();
    for pattern in patterns {
        for candidate in &pattern.candidate_fixes {
            if candidate.command.trim().is_empty() || candidate.explanation.trim().is_empty() {
                continue;
            }
            if !seen.insert(candidate.command.as_str()) {
                continue;
            }
            let risk_level = risk::classify(&candidate.command, candidate.declared_risk);
            let score = pattern.confidence * weight - risk_penalty(risk_level);
            scored.push((
                score,
                Fix {
                    command: candidate.command.clone(),
                    explanation: candidate.explanation.clone(),
                    risk_level,
                    reasoning: pattern.explanation.clone(),
                    confidence: pattern.confidence,
                },
            ));
        }
    }

    // Stable sort: equal scores keep encounter order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(max_fixes.min(MAX_FIXES_CAP))
        .map(|(_, fix)| fix)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisMethod, CandidateFix, Confidence, ErrorType};

    fn candidate(command: &str, risk: RiskLevel) -> CandidateFix {
        CandidateFix {
            command: command.to_string(),
            explanation: format!("run {}", command),
            declared_risk: risk,
        }
    }

    fn pattern(id: &str, confidence: f64, fixes: Vec<CandidateFix>) -> PatternMatch {
        PatternMatch {
            pattern_id: id.to_string(),
            error_type: ErrorType::Unknown,
            confidence,
            explanation: "something went wrong".to_string(),
            candidate_fixes: fixes,
        }
    }

    fn analysis(patterns: Vec<PatternMatch>) -> Analysis {
        Analysis {
            root_cause: "something went wrong".to_string(),
            error_type: ErrorType::Unknown,
            confidence: Confidence::High,
            analysis_method: AnalysisMethod::Heuristic,
            raw_patterns: patterns,
        }
    }

    #[test]
    fn test_truncates_to_three() {
        let fixes = rank(
            &analysis(vec![pattern(
                "a",
                0.9,
                vec![
                    candidate("cmd-1", RiskLevel::Low),
                    candidate("cmd-2", RiskLevel::Low),
                    candidate("cmd-3", RiskLevel::Low),
                    candidate("cmd-4", RiskLevel::Low),
                ],
            )]),
            3,
        );
        assert_eq!(fixes.len(), 3);
    }

    #[test]
    fn test_max_fixes_is_hard_capped() {
        let many: Vec<CandidateFix> = (0..6)
            .map(|i| candidate(&format!("cmd-{}", i), RiskLevel::Low))
            .collect();
        let fixes = rank(&analysis(vec![pattern("a", 0.9, many)]), 10);
        assert_eq!(fixes.len(), 3);
    }

    #[test]
    fn test_all_fixes_non_empty() {
        let fixes = rank(
            &analysis(vec![pattern(
                "a",
                0.9,
                vec![
                    CandidateFix {
                        command: "   ".to_string(),
                        explanation: "blank".to_string(),
                        declared_risk: RiskLevel::Low,
                    },
                    candidate("echo ok", RiskLevel::Low),
                ],
            )]),
            3,
        );
        assert_eq!(fixes.len(), 1);
        assert!(!fixes[0].command.is_empty());
        assert!(!fixes[0].explanation.is_empty());
    }

    #[test]
    fn test_dedup_keeps_highest_confidence_occurrence() {
        let fixes = rank(
            &analysis(vec![
                pattern("low", 0.4, vec![candidate("pip install x", RiskLevel::Low)]),
                pattern("high", 0.9, vec![candidate("pip install x", RiskLevel::Low)]),
            ]),
            3,
        );
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].confidence, 0.9);
    }

    #[test]
    fn test_sorted_by_descending_composite_score() {
        let fixes = rank(
            &analysis(vec![
                pattern("weak", 0.4, vec![candidate("ls", RiskLevel::Low)]),
                pattern("strong", 0.9, vec![candidate("git init", RiskLevel::Low)]),
            ]),
            3,
        );
        assert_eq!(fixes[0].command, "git init");
        assert_eq!(fixes[1].command, "ls");
    }

    #[test]
    fn test_risk_penalty_breaks_equal_confidence() {
        // same match confidence; the escalated fix must rank below the safe one
        let fixes = rank(
            &analysis(vec![pattern(
                "a",
                0.9,
                vec![
                    candidate("sudo systemctl start docker", RiskLevel::Low),
                    candidate("git init", RiskLevel::Low),
                ],
            )]),
            3,
        );
        assert_eq!(fixes[0].command, "git init");
        assert_eq!(fixes[0].risk_level, RiskLevel::Low);
        assert_eq!(fixes[1].command, "sudo systemctl start docker");
        assert_eq!(fixes[1].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_classifies_substituted_command_text() {
        // the template looked benign but the interpolated argument is not
        let fixes = rank(
            &analysis(vec![pattern(
                "a",
                0.9,
                vec![candidate("rm -rf /tmp/build-cache", RiskLevel::Low)],
            )]),
            3,
        );
        assert_eq!(fixes[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_reordered_input_yields_identical_output() {
        let a = pattern("alpha", 0.9, vec![candidate("cmd-a", RiskLevel::Low)]);
        let b = pattern("beta", 0.9, vec![candidate("cmd-b", RiskLevel::Low)]);
        let c = pattern("gamma", 0.5, vec![candidate("cmd-c", RiskLevel::Low)]);
        let forward = rank(&analysis(vec![a.clone(), b.clone(), c.clone()]), 3);
        let backward = rank(&analysis(vec![c, b, a]), 3);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let input = analysis(vec![
            pattern("a", 0.9, vec![candidate("chmod +x run.sh", RiskLevel::Low)]),
            pattern("b", 0.9, vec![candidate("sudo ./run.sh", RiskLevel::Medium)]),
            pattern("c", 0.6, vec![candidate("ls -la", RiskLevel::Low)]),
        ]);
        let first = rank(&input, 3);
        let second = rank(&input, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_candidates_yield_empty_ranking() {
        let fixes = rank(&analysis(vec![pattern("a", 0.9, Vec::new())]), 3);
        assert!(fixes.is_empty());
    }
}
