//! Luck score record and reporting contract
//!
//! Both mini-games hand their terminal results to a [`ScoreSink`]. Every
//! update is a merge (max / boolean-or), so repeated or reordered reports
//! from later sessions can only ever raise the record.

use serde::{Deserialize, Serialize};

/// Receiver for finished game results. Fire-and-forget: synchronous, no
/// return value, never fails.
pub trait ScoreSink {
    /// Record a finished catch-game score; the sink keeps the maximum ever
    /// achieved.
    fn report_catch_score(&mut self, value: u32);

    /// Mark the puzzle as completed at least once.
    fn report_puzzle_solved(&mut self);
}

/// Persisted luck record shared by both games
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckScores {
    /// Best catch-game score across all sessions
    pub catch_best: u32,
    /// Whether the puzzle has ever been completed
    pub puzzle_solved: bool,
}

impl ScoreSink for LuckScores {
    fn report_catch_score(&mut self, value: u32) {
        self.catch_best = self.catch_best.max(value);
    }

    fn report_puzzle_solved(&mut self) {
        self.puzzle_solved = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_score_keeps_maximum() {
        let mut scores = LuckScores::default();
        for value in [5, 12, 3, 20] {
            scores.report_catch_score(value);
        }
        assert_eq!(scores.catch_best, 20);

        // Order does not matter
        let mut reversed = LuckScores::default();
        for value in [20, 3, 12, 5] {
            reversed.report_catch_score(value);
        }
        assert_eq!(scores, reversed);

        // A worse later session cannot lower the record
        scores.report_catch_score(0);
        assert_eq!(scores.catch_best, 20);
    }

    #[test]
    fn test_puzzle_flag_never_clears() {
        let mut scores = LuckScores::default();
        assert!(!scores.puzzle_solved);

        scores.report_puzzle_solved();
        assert!(scores.puzzle_solved);

        scores.report_puzzle_solved();
        assert!(scores.puzzle_solved);
    }
}
