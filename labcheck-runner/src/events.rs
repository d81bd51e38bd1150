// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events emitted while a check is in progress.
//!
//! The runner never talks to the terminal directly. It reports progress
//! through these events, and the reporter decides how to render them. This
//! keeps the scoring core independent of any particular output style.

use crate::stats::RunStats;
use camino::Utf8PathBuf;
use std::time::Duration;

/// An event emitted during a checking run.
#[derive(Clone, Debug)]
pub enum CheckEvent {
    /// A checking run has started.
    CheckStarted {
        /// The program under check.
        program: Utf8PathBuf,
        /// The number of trials requested.
        trials: usize,
    },

    /// A trial exceeded its time budget and its process is being killed.
    ///
    /// Any output the process managed to write before the kill is still
    /// scored, so this event may be followed by a successful trial.
    TrialTimeout {
        /// The 0-based index of the trial.
        trial: usize,
    },

    /// A trial finished and was folded into the aggregate count.
    TrialFinished {
        /// The 0-based index of the trial.
        trial: usize,
        /// Whether the captured output contained the secret.
        matched: bool,
    },

    /// The run ended and a verdict was reached.
    CheckFinished {
        /// Aggregate counters for the run.
        stats: RunStats,
        /// Whether the observed pass rate met the threshold.
        verdict: bool,
        /// The threshold the run was graded against.
        threshold: f64,
        /// Wall-clock time for the whole run.
        elapsed: Duration,
    },
}
