use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum StatsError {
    #[error("percentage {value} is out of range")]
    PercentageOutOfRange { value: u8 },

    #[error("average {avg} is out of range")]
    AverageOutOfRange { avg: f64 },

    #[error("best percentage recorded without any session")]
    BestWithoutSessions,
}

/// Cross-session aggregate statistics.
///
/// Stored as three scalars so persistence stays O(1) in the number of
/// sessions: the running average is folded incrementally instead of being
/// recomputed from history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuizStats {
    total_sessions: u32,
    average_percentage: f64,
    best_percentage: u8,
}

impl QuizStats {
    /// Rehydrate stats from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `StatsError` if a percentage is outside 0..=100 or a best
    /// score exists without any recorded session.
    pub fn from_persisted(
        total_sessions: u32,
        average_percentage: f64,
        best_percentage: u8,
    ) -> Result<Self, StatsError> {
        if best_percentage > 100 {
            return Err(StatsError::PercentageOutOfRange {
                value: best_percentage,
            });
        }
        if !(0.0..=100.0).contains(&average_percentage) {
            return Err(StatsError::AverageOutOfRange {
                avg: average_percentage,
            });
        }
        if total_sessions == 0 && best_percentage > 0 {
            return Err(StatsError::BestWithoutSessions);
        }

        Ok(Self {
            total_sessions,
            average_percentage,
            best_percentage,
        })
    }

    /// Fold one completed session's percentage into the aggregates.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::PercentageOutOfRange` if `percentage` exceeds 100.
    pub fn record(&mut self, percentage: u8) -> Result<(), StatsError> {
        if percentage > 100 {
            return Err(StatsError::PercentageOutOfRange { value: percentage });
        }

        let old_count = f64::from(self.total_sessions);
        self.total_sessions = self.total_sessions.saturating_add(1);
        self.average_percentage = (self.average_percentage * old_count + f64::from(percentage))
            / f64::from(self.total_sessions);
        self.best_percentage = self.best_percentage.max(percentage);
        Ok(())
    }

    #[must_use]
    pub fn total_sessions(&self) -> u32 {
        self.total_sessions
    }

    #[must_use]
    pub fn average_percentage(&self) -> f64 {
        self.average_percentage
    }

    #[must_use]
    pub fn best_percentage(&self) -> u8 {
        self.best_percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_updates_count_average_and_best() {
        let mut stats = QuizStats::default();
        stats.record(80).unwrap();
        stats.record(60).unwrap();

        assert_eq!(stats.total_sessions(), 2);
        assert!((stats.average_percentage() - 70.0).abs() < f64::EPSILON);
        assert_eq!(stats.best_percentage(), 80);
    }

    #[test]
    fn best_is_a_high_water_mark() {
        let mut stats = QuizStats::default();
        stats.record(90).unwrap();
        stats.record(10).unwrap();
        assert_eq!(stats.best_percentage(), 90);
    }

    #[test]
    fn incremental_average_matches_full_recompute() {
        let scores = [100_u8, 35, 67, 0, 88];
        let mut stats = QuizStats::default();
        for s in scores {
            stats.record(s).unwrap();
        }

        let expected = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64;
        assert!((stats.average_percentage() - expected).abs() < 1e-9);
    }

    #[test]
    fn record_rejects_out_of_range_percentage() {
        let mut stats = QuizStats::default();
        let err = stats.record(101).unwrap_err();
        assert!(matches!(err, StatsError::PercentageOutOfRange { value: 101 }));
        assert_eq!(stats.total_sessions(), 0);
    }

    #[test]
    fn from_persisted_validates_ranges() {
        assert!(QuizStats::from_persisted(3, 66.5, 90).is_ok());
        assert!(matches!(
            QuizStats::from_persisted(3, 120.0, 90),
            Err(StatsError::AverageOutOfRange { .. })
        ));
        assert!(matches!(
            QuizStats::from_persisted(0, 0.0, 10),
            Err(StatsError::BestWithoutSessions)
        ));
    }
}
