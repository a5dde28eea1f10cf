//! Confidence and manual-review policy.
//!
//! Pure mapping from a resolution to a status, a reason and a confidence.

use super::span::Resolution;
use crate::models::config::MatchThresholds;
use crate::models::matching::MatchResult;
use crate::models::plan::PlanStatus;

pub const REASON_LOW_CONFIDENCE: &str = "low-confidence match";
pub const REASON_NO_MATCH: &str = "unsupported/no match";
pub const REASON_NON_ADJACENT: &str = "non-adjacent episode span";
pub const REASON_NO_CATALOG: &str = "no canonical data";

/// Review decision for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: PlanStatus,
    pub reason: Option<String>,
    pub confidence: f32,
}

impl Verdict {
    pub fn manual(reason: &str, confidence: f32) -> Self {
        Self {
            status: PlanStatus::Manual,
            reason: Some(reason.to_string()),
            confidence,
        }
    }
}

/// Apply the score thresholds.
pub fn verdict_for_score(score: f32, thresholds: &MatchThresholds) -> Verdict {
    if score >= thresholds.auto_min {
        Verdict {
            status: PlanStatus::Auto,
            reason: None,
            confidence: score,
        }
    } else if score >= thresholds.manual_min {
        Verdict::manual(REASON_LOW_CONFIDENCE, score)
    } else {
        Verdict::manual(REASON_NO_MATCH, score)
    }
}

/// Whether a match would be applied automatically.
pub fn is_auto(result: &MatchResult, thresholds: &MatchThresholds) -> bool {
    result.is_match() && result.ambiguity.is_none() && result.score >= thresholds.auto_min
}

/// Decide status, reason and confidence for a resolution.
pub fn assess(resolution: &Resolution, thresholds: &MatchThresholds) -> Verdict {
    match resolution {
        Resolution::Span(result) if result.is_match() => match &result.ambiguity {
            Some(reason) => Verdict::manual(reason, result.score),
            None => verdict_for_score(result.score, thresholds),
        },
        Resolution::NonAdjacent(_) => Verdict::manual(REASON_NON_ADJACENT, 0.0),
        _ => Verdict::manual(REASON_NO_MATCH, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::CanonicalEpisode;
    use crate::models::matching::MatchMethod;

    fn span(score: f32) -> Resolution {
        let ep = CanonicalEpisode::new(1, 1, "Title", None);
        Resolution::Span(MatchResult::single(&ep, MatchMethod::Fuzzy, score))
    }

    #[test]
    fn test_thresholds() {
        let t = MatchThresholds::default();
        assert_eq!(assess(&span(0.75), &t).status, PlanStatus::Auto);
        assert_eq!(assess(&span(1.0), &t).reason, None);

        let low = assess(&span(0.65), &t);
        assert_eq!(low.status, PlanStatus::Manual);
        assert_eq!(low.reason.as_deref(), Some(REASON_LOW_CONFIDENCE));
        assert_eq!(low.confidence, 0.65);

        let none = assess(&span(0.39), &t);
        assert_eq!(none.reason.as_deref(), Some(REASON_NO_MATCH));
    }

    #[test]
    fn test_unresolved() {
        let t = MatchThresholds::default();
        let verdict = assess(&Resolution::Unmatched, &t);
        assert_eq!(verdict.status, PlanStatus::Manual);
        assert_eq!(verdict.reason.as_deref(), Some(REASON_NO_MATCH));
        assert_eq!(verdict.confidence, 0.0);

        let verdict = assess(&Resolution::NonAdjacent(Vec::new()), &t);
        assert_eq!(verdict.reason.as_deref(), Some(REASON_NON_ADJACENT));
    }

    #[test]
    fn test_flagged_match_is_manual() {
        let t = MatchThresholds::default();
        let ep = CanonicalEpisode::new(1, 1, "Title", None);
        let result = MatchResult::single(&ep, MatchMethod::Exact, 1.0).flagged("ambiguous three-episode split");
        let verdict = assess(&Resolution::Span(result.clone()), &t);
        assert_eq!(verdict.status, PlanStatus::Manual);
        assert_eq!(verdict.reason.as_deref(), Some("ambiguous three-episode split"));
        assert!(!is_auto(&result, &t));
    }
}
