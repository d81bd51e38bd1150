// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The trial runner: executes the checking protocol for one program.
//!
//! Trials run strictly one after another. Trial `i + 1` never starts until
//! trial `i`'s process has been fully reaped and its output captured, and no
//! resource is held across trial boundaries.

use crate::{
    errors::{LaunchError, RunnerBuildError},
    events::CheckEvent,
    spec::CheckSpec,
    stats::RunStats,
    trial_command::TrialCommand,
};
use bstr::ByteSlice;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::debug;

/// Executes checking runs.
///
/// Owns a current-thread tokio runtime: the only concurrency in a run is
/// between reading a child's stdout and waiting for it to exit.
#[derive(Debug)]
pub struct CheckRunner {
    runtime: Runtime,
}

impl CheckRunner {
    /// Creates a new runner.
    pub fn new() -> Result<Self, RunnerBuildError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RunnerBuildError::TokioRuntimeCreate)?;
        Ok(Self { runtime })
    }

    /// Runs all trials for `spec`, reporting progress through `report`.
    ///
    /// Returns the final statistics and verdict. This fails only if the
    /// target program cannot be launched at all; timeouts and non-matching
    /// output are absorbed into the statistics and never abort the run.
    pub fn execute<F>(&self, spec: &CheckSpec, mut report: F) -> Result<RunResult, LaunchError>
    where
        F: FnMut(CheckEvent),
    {
        self.runtime.block_on(self.execute_impl(spec, &mut report))
    }

    async fn execute_impl(
        &self,
        spec: &CheckSpec,
        report: &mut dyn FnMut(CheckEvent),
    ) -> Result<RunResult, LaunchError> {
        let start = Instant::now();
        report(CheckEvent::CheckStarted {
            program: spec.program().to_owned(),
            trials: spec.trials(),
        });

        let mut stats = RunStats {
            requested: spec.trials(),
            ..RunStats::default()
        };

        for trial in 0..spec.trials() {
            let outcome = self.run_trial(spec, trial, report).await?;
            stats.attempted = trial + 1;
            if outcome.matched {
                stats.successes += 1;
            }
            report(CheckEvent::TrialFinished {
                trial,
                matched: outcome.matched,
            });

            if outcome.matched && spec.pass_once() {
                // With pass-once, the run is considered fully attempted as
                // soon as one trial succeeds.
                break;
            }
        }

        let verdict = stats.verdict(spec.threshold());
        report(CheckEvent::CheckFinished {
            stats,
            verdict,
            threshold: spec.threshold(),
            elapsed: start.elapsed(),
        });

        Ok(RunResult { stats, verdict })
    }

    /// Runs a single trial: spawn, wait with a deadline, kill and drain on
    /// timeout, then score the captured output.
    async fn run_trial(
        &self,
        spec: &CheckSpec,
        trial: usize,
        report: &mut dyn FnMut(CheckEvent),
    ) -> Result<TrialOutcome, LaunchError> {
        let mut trial_child = TrialCommand::new(spec.program())
            .spawn()
            .map_err(|error| LaunchError::new(spec.program(), error))?;

        let mut timed_out = false;
        let mut sleep = std::pin::pin!(tokio::time::sleep(spec.timeout()));

        let res = loop {
            tokio::select! {
                () = trial_child.stdout.fill_buf(), if !trial_child.stdout.is_done() => {}
                res = trial_child.child.wait() => {
                    // The trial finished within its budget (or after a kill).
                    break res;
                }
                () = &mut sleep, if !timed_out => {
                    // Out of time: kill the process and score whatever output
                    // it managed to produce.
                    timed_out = true;
                    report(CheckEvent::TrialTimeout { trial });
                    if let Err(error) = trial_child.child.start_kill() {
                        // A failed kill can only race with the child's own
                        // exit, which the wait branch will pick up.
                        debug!(trial, %error, "kill failed; process has likely exited");
                    }
                }
            }
        };

        if let Err(error) = res {
            debug!(trial, %error, "error waiting for trial process");
        }

        let output = trial_child.stdout.drain().await;
        let matched = output.find(spec.secret()).is_some();
        debug!(
            trial,
            matched,
            timed_out,
            output_len = output.len(),
            "trial finished"
        );

        Ok(TrialOutcome { matched })
    }
}

/// Transient result of one trial, folded into [`RunStats`] and discarded.
struct TrialOutcome {
    matched: bool,
}

/// The final outcome of a checking run.
#[derive(Clone, Copy, Debug)]
pub struct RunResult {
    /// Aggregate counters for the run.
    pub stats: RunStats,
    /// Whether the success ratio met the required threshold.
    pub verdict: bool,
}
