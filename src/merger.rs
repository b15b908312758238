use crate::matcher::UNKNOWN_CONFIDENCE;
use crate::types::{AiAnalysis, Analysis, AnalysisMethod, Confidence, ErrorType, PatternMatch};

// Combine the heuristic matches with an optional AI result. Any kind of AI
// absence (disabled, timed out, errored, low confidence) leaves the
// heuristic baseline untouched; this function never fails. The AI result
// can replace root_cause and error_type but never contributes fix
// candidates: raw_patterns always carries the full heuristic list.
pub fn merge(
    heuristic: Vec<PatternMatch>,
    ai: Option<AiAnalysis>,
    confidence_threshold: f64,
) -> Analysis {
    let (mut root_cause, mut error_type, mut score) = match heuristic.first() {
        Some(top) => (top.explanation.clone(), top.error_type, top.confidence),
        None => (
            ErrorType::Unknown.describe().to_string(),
            ErrorType::Unknown,
            UNKNOWN_CONFIDENCE,
        ),
    };
    let mut analysis_method = AnalysisMethod::Heuristic;

    if let Some(ai) = ai {
        if ai.confidence > confidence_threshold {
            analysis_method = if ai.error_type == error_type {
                // Both sources agree; corroboration raises the floor.
                score = score.max(ai.confidence);
                AnalysisMethod::Hybrid
            } else {
                score = ai.confidence;
                AnalysisMethod::Ai
            };
            root_cause = ai.root_cause;
            error_type = ai.error_type;
        }
    }

    Analysis {
        root_cause,
        error_type,
        confidence: Confidence::from_score(score),
        analysis_method,
        raw_patterns: heuristic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateFix, RiskLevel};

    fn pattern_match(id: &str, error_type: ErrorType, confidence: f64) -> PatternMatch {
        PatternMatch {
            pattern_id: id.to_string(),
            error_type,
            confidence,
            explanation: error_type.describe().to_string(),
            candidate_fixes: vec![CandidateFix {
                command: format!("fix-{}", id),
                explanation: "do the thing".to_string(),
                declared_risk: RiskLevel::Low,
            }],
        }
    }

    fn ai(error_type: ErrorType, confidence: f64) -> AiAnalysis {
        AiAnalysis {
            root_cause: "the daemon is not running".to_string(),
            error_type,
            confidence,
            reasoning: "stderr mentions the daemon socket".to_string(),
        }
    }

    #[test]
    fn test_no_ai_result_stays_heuristic() {
        let matches = vec![pattern_match("a", ErrorType::PermissionDenied, 0.9)];
        let analysis = merge(matches, None, 0.7);
        assert_eq!(analysis.analysis_method, AnalysisMethod::Heuristic);
        assert_eq!(analysis.error_type, ErrorType::PermissionDenied);
        assert_eq!(analysis.confidence, Confidence::High);
    }

    #[test]
    fn test_low_confidence_ai_is_ignored() {
        let matches = vec![pattern_match("a", ErrorType::PermissionDenied, 0.9)];
        let analysis = merge(matches, Some(ai(ErrorType::NetworkError, 0.5)), 0.7);
        assert_eq!(analysis.analysis_method, AnalysisMethod::Heuristic);
        assert_eq!(analysis.error_type, ErrorType::PermissionDenied);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let matches = vec![pattern_match("a", ErrorType::PermissionDenied, 0.9)];
        let analysis = merge(matches, Some(ai(ErrorType::NetworkError, 0.7)), 0.7);
        assert_eq!(analysis.analysis_method, AnalysisMethod::Heuristic);
    }

    #[test]
    fn test_confident_ai_replaces_baseline() {
        let matches = vec![pattern_match("a", ErrorType::PermissionDenied, 0.9)];
        let analysis = merge(matches.clone(), Some(ai(ErrorType::NetworkError, 0.85)), 0.7);
        assert_eq!(analysis.analysis_method, AnalysisMethod::Ai);
        assert_eq!(analysis.error_type, ErrorType::NetworkError);
        assert_eq!(analysis.root_cause, "the daemon is not running");
        // fix generation is never starved: heuristic matches are retained
        assert_eq!(analysis.raw_patterns, matches);
    }

    #[test]
    fn test_agreeing_ai_marks_hybrid() {
        let matches = vec![pattern_match("a", ErrorType::PermissionDenied, 0.9)];
        let analysis = merge(matches, Some(ai(ErrorType::PermissionDenied, 0.8)), 0.7);
        assert_eq!(analysis.analysis_method, AnalysisMethod::Hybrid);
        assert_eq!(analysis.error_type, ErrorType::PermissionDenied);
        assert_eq!(analysis.confidence, Confidence::High);
    }

    #[test]
    fn test_failed_ai_is_equivalent_to_disabled_ai() {
        // timeout, error, and disabled all surface as None and must rank
        // identically
        let matches = vec![
            pattern_match("a", ErrorType::PermissionDenied, 0.9),
            pattern_match("b", ErrorType::FileNotFound, 0.75),
        ];
        let after_failure = merge(matches.clone(), None, 0.7);
        let never_attempted = merge(matches.clone(), None, 0.7);
        let rejected = merge(matches, Some(ai(ErrorType::NetworkError, 0.3)), 0.7);
        assert_eq!(after_failure.analysis_method, AnalysisMethod::Heuristic);
        assert_eq!(after_failure, never_attempted);
        assert_eq!(
            crate::ranker::rank(&after_failure, 3),
            crate::ranker::rank(&rejected, 3)
        );
    }

    #[test]
    fn test_empty_heuristic_list_defaults_to_unknown() {
        let analysis = merge(Vec::new(), None, 0.7);
        assert_eq!(analysis.error_type, ErrorType::Unknown);
        assert_eq!(analysis.analysis_method, AnalysisMethod::Heuristic);
        assert_eq!(analysis.confidence, Confidence::Low);
        assert!(analysis.raw_patterns.is_empty());
    }
}
