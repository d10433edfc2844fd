//! Readiness score aggregation

use super::TokenDetail;

/// Reported when there is nothing to score
pub const NOT_APPLICABLE: i32 = -1;

/// Best possible readiness
pub const MAX_SCORE: i32 = 10;

/// Minimum transition and strict contribution, clamped to `0..=MAX_SCORE`.
///
/// An empty list yields [`NOT_APPLICABLE`] for both.
pub fn compute_scores(details: &[TokenDetail]) -> (i32, i32) {
    let reduce = |pick: fn(&TokenDetail) -> i32| {
        details
            .iter()
            .map(pick)
            .min()
            .map(|score| score.clamp(0, MAX_SCORE))
            .unwrap_or(NOT_APPLICABLE)
    };

    (reduce(|d| d.score_transition), reduce(|d| d.score_strict))
}
