//! Score arithmetic shared by the session and results layers.
//!
//! The scaled-score mapping is a deliberately simple linear model onto the
//! exam's 10..=950 range, not a calibrated psychometric one.

/// Lowest possible scaled score.
pub const MIN_SCALED_SCORE: u16 = 10;

/// Highest scaled score the linear model reaches at 100%.
pub const MAX_SCALED_SCORE: u16 = 950;

/// Goal the learner is drilling toward.
pub const TARGET_SCALED_SCORE: u16 = 850;

/// Percentage of correct answers, rounded to the nearest integer.
///
/// Defined as 0 for an empty session.
#[must_use]
pub fn score_percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Integer rounding: (2 * 100 * correct + total) / (2 * total).
    let pct = (200 * correct as u64 + total as u64) / (2 * total as u64);
    u8::try_from(pct).unwrap_or(100)
}

/// Linear estimate of the scaled score for a percentage in 0..=100.
#[must_use]
pub fn estimated_scaled_score(percentage: u8) -> u16 {
    let pct = u32::from(percentage.min(100));
    let range = u32::from(MAX_SCALED_SCORE - MIN_SCALED_SCORE);
    MIN_SCALED_SCORE + u16::try_from(pct * range / 100).unwrap_or(MAX_SCALED_SCORE)
}

/// Whether the estimated scaled score meets the target.
#[must_use]
pub fn is_target_reached(percentage: u8) -> bool {
    estimated_scaled_score(percentage) >= TARGET_SCALED_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(score_percentage(2, 3), 67);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(1, 2), 50);
        assert_eq!(score_percentage(20, 20), 100);
    }

    #[test]
    fn percentage_of_empty_session_is_zero() {
        assert_eq!(score_percentage(0, 0), 0);
    }

    #[test]
    fn scaled_score_anchors() {
        assert_eq!(estimated_scaled_score(0), 10);
        assert_eq!(estimated_scaled_score(100), 950);
        assert_eq!(estimated_scaled_score(90), 856);
        assert_eq!(estimated_scaled_score(50), 480);
    }

    #[test]
    fn target_boundary() {
        assert!(is_target_reached(90));
        assert!(!is_target_reached(89));
        assert!(is_target_reached(100));
        assert!(!is_target_reached(0));
    }
}
