// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate statistics for a checking run.

/// Counters accumulated over a checking run.
///
/// Invariant: `successes <= attempted <= requested` at all times. `attempted`
/// falls short of `requested` only when pass-once mode exits early, in which
/// case it equals the 1-based index of the first successful trial.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The number of trials originally requested.
    pub requested: usize,
    /// The number of trials actually attempted.
    pub attempted: usize,
    /// The number of attempted trials whose output contained the secret.
    pub successes: usize,
}

impl RunStats {
    /// The observed success ratio, in `[0.0, 1.0]`.
    ///
    /// Computed against `attempted`, never `requested`: in pass-once mode the
    /// trials that were skipped do not count against the grade.
    pub fn ratio(&self) -> f64 {
        debug_assert!(self.attempted > 0, "at least one trial always runs");
        self.successes as f64 / self.attempted as f64
    }

    /// Whether the observed success count meets `threshold`.
    ///
    /// A pure function of `(successes, attempted, threshold)`, evaluated on
    /// un-rounded values rather than the percentage shown to the user.
    pub fn verdict(&self, threshold: f64) -> bool {
        self.successes as f64 >= threshold * self.attempted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4, 5, 0.80, true; "exactly at threshold")]
    #[test_case(3, 5, 0.80, false; "below threshold")]
    #[test_case(5, 5, 0.80, true; "all passed")]
    #[test_case(0, 5, 0.80, false; "all timed out")]
    #[test_case(1, 5, 0.20, true; "one success at a low bar")]
    #[test_case(1, 2, 0.20, true; "pass once graded against attempted")]
    #[test_case(0, 1, 0.0, true; "zero threshold always passes")]
    fn verdict(successes: usize, attempted: usize, threshold: f64, expected: bool) {
        let stats = RunStats {
            requested: 5,
            attempted,
            successes,
        };
        assert_eq!(stats.verdict(threshold), expected);
    }

    #[test]
    fn ratio_uses_attempted_not_requested() {
        let stats = RunStats {
            requested: 5,
            attempted: 2,
            successes: 1,
        };
        assert_eq!(stats.ratio(), 0.5);
    }
}
