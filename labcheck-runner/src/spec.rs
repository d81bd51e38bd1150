// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trial specifications: what to run and how to grade it.

use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;

/// Immutable configuration for one checking run.
///
/// Created once per invocation from the fixed per-part table and never
/// mutated. The defaults match the common case for lab parts: 5 trials, an
/// 80% threshold, a 30 second timeout, and no early exit.
#[derive(Clone, Debug)]
pub struct CheckSpec {
    program: Utf8PathBuf,
    secret: Vec<u8>,
    trials: usize,
    threshold: f64,
    timeout: Duration,
    pass_once: bool,
}

impl CheckSpec {
    /// Creates a new spec for `program`, successful when `secret` appears
    /// anywhere in its standard output.
    ///
    /// A bare program name is resolved relative to the current directory, not
    /// through `PATH`.
    pub fn new(program: impl Into<Utf8PathBuf>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            program: program.into(),
            secret: secret.into(),
            trials: 5,
            threshold: 0.80,
            timeout: Duration::from_secs(30),
            pass_once: false,
        }
    }

    /// Sets the number of trials to attempt. Must be at least 1.
    pub fn with_trials(mut self, trials: usize) -> Self {
        assert!(trials >= 1, "at least one trial must be requested");
        self.trials = trials;
        self
    }

    /// Sets the fraction of attempted trials, in `[0.0, 1.0]`, that must
    /// succeed for the part to pass.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&threshold),
            "threshold must be within [0.0, 1.0]"
        );
        self.threshold = threshold;
        self
    }

    /// Sets the wall-clock budget for a single trial. Must be nonzero.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "timeout must be nonzero");
        self.timeout = timeout;
        self
    }

    /// When true, the run stops as soon as a single trial succeeds, and is
    /// graded against the trials attempted up to that point.
    pub fn with_pass_once(mut self, pass_once: bool) -> Self {
        self.pass_once = pass_once;
        self
    }

    /// The program under check.
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    /// The byte sequence whose presence in captured output marks a trial
    /// successful.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// The number of trials requested.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// The success-rate threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The per-trial timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the run stops after the first success.
    pub fn pass_once(&self) -> bool {
        self.pass_once
    }
}
