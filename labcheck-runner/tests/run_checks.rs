// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests that exercise real child processes.

#![cfg(unix)]

use camino::Utf8PathBuf;
use camino_tempfile::Utf8TempDir;
use labcheck_runner::{events::CheckEvent, runner::CheckRunner, spec::CheckSpec, stats::RunStats};
use std::{fs, os::unix::fs::PermissionsExt, time::Duration};

fn write_script(dir: &Utf8TempDir, name: &str, contents: &str) -> Utf8PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{contents}\n")).expect("script written");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("script made executable");
    path
}

fn execute(spec: &CheckSpec) -> (Result<(RunStats, bool), String>, Vec<CheckEvent>) {
    let runner = CheckRunner::new().expect("runner built");
    let mut events = Vec::new();
    let result = runner
        .execute(spec, |event| events.push(event))
        .map(|run| (run.stats, run.verdict))
        .map_err(|error| error.to_string());
    (result, events)
}

fn trials_finished(events: &[CheckEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, CheckEvent::TrialFinished { .. }))
        .count()
}

fn timeouts(events: &[CheckEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, CheckEvent::TrialTimeout { .. }))
        .count()
}

#[test]
fn secret_in_surrounding_output_counts_as_success() {
    let dir = Utf8TempDir::new().expect("tempdir created");
    let script = write_script(&dir, "solution", "printf 'noise MIT{t0k3n} more noise'");

    let spec = CheckSpec::new(script, &b"MIT{t0k3n}"[..])
        .with_trials(3)
        .with_threshold(1.0)
        .with_timeout(Duration::from_secs(10));
    let (result, events) = execute(&spec);

    let (stats, verdict) = result.expect("run completed");
    assert!(verdict, "every trial should match");
    assert_eq!(
        stats,
        RunStats {
            requested: 3,
            attempted: 3,
            successes: 3,
        }
    );
    assert_eq!(trials_finished(&events), 3);
    assert_eq!(timeouts(&events), 0);
}

#[test]
fn non_matching_output_is_a_failure_not_an_error() {
    let dir = Utf8TempDir::new().expect("tempdir created");
    let script = write_script(&dir, "solution", "printf 'MIT{wr0ng}'");

    let spec = CheckSpec::new(script, &b"MIT{r1ght}"[..])
        .with_trials(2)
        .with_threshold(0.5)
        .with_timeout(Duration::from_secs(10));
    let (result, events) = execute(&spec);

    let (stats, verdict) = result.expect("a non-match is not an error");
    assert!(!verdict);
    assert_eq!(stats.successes, 0);
    assert_eq!(stats.attempted, 2);
    assert_eq!(trials_finished(&events), 2);
}

#[test]
fn pass_once_stops_at_first_success() {
    let dir = Utf8TempDir::new().expect("tempdir created");
    // Fails on the first run (while creating the marker), succeeds on the
    // second. The marker path is absolute since trials run from the test cwd.
    let marker = dir.path().join("marker");
    let script = write_script(
        &dir,
        "flaky",
        &format!("if [ -e {marker} ]; then printf 'MIT{{f1rst}}'; else : > {marker}; fi"),
    );

    let spec = CheckSpec::new(script, &b"MIT{f1rst}"[..])
        .with_trials(5)
        .with_threshold(0.20)
        .with_timeout(Duration::from_secs(10))
        .with_pass_once(true);
    let (result, events) = execute(&spec);

    let (stats, verdict) = result.expect("run completed");
    assert!(verdict, "1 of 2 attempted meets a 20% threshold");
    assert_eq!(
        stats,
        RunStats {
            requested: 5,
            attempted: 2,
            successes: 1,
        }
    );
    // Trials 3 through 5 never ran.
    assert_eq!(trials_finished(&events), 2);
}

#[test]
fn timeout_kills_the_trial_and_scores_partial_output() {
    let dir = Utf8TempDir::new().expect("tempdir created");
    let script = write_script(&dir, "slow", "printf 'MIT{p4rt14l}'; sleep 60");

    let spec = CheckSpec::new(script, &b"MIT{p4rt14l}"[..])
        .with_trials(1)
        .with_threshold(1.0)
        .with_timeout(Duration::from_secs(1));
    let (result, events) = execute(&spec);

    let (stats, verdict) = result.expect("a timeout is not an error");
    assert!(verdict, "the partial output written before the kill matches");
    assert_eq!(stats.successes, 1);
    assert_eq!(timeouts(&events), 1);
}

#[test]
fn every_trial_timing_out_fails_the_run() {
    let dir = Utf8TempDir::new().expect("tempdir created");
    let script = write_script(&dir, "hang", "sleep 60");

    let spec = CheckSpec::new(script, &b"MIT{n3v3r}"[..])
        .with_trials(2)
        .with_threshold(0.80)
        .with_timeout(Duration::from_millis(500));
    let (result, events) = execute(&spec);

    let (stats, verdict) = result.expect("timeouts are absorbed into the statistics");
    assert!(!verdict);
    assert_eq!(
        stats,
        RunStats {
            requested: 2,
            attempted: 2,
            successes: 0,
        }
    );
    assert_eq!(timeouts(&events), 2);
    assert_eq!(trials_finished(&events), 2);
}

#[test]
fn missing_program_is_a_launch_error() {
    let dir = Utf8TempDir::new().expect("tempdir created");
    let missing = dir.path().join("does-not-exist");

    let spec = CheckSpec::new(missing, &b"MIT{x}"[..]).with_trials(3);
    let (result, events) = execute(&spec);

    let error = result.expect_err("spawn failure propagates");
    assert!(
        error.contains("does-not-exist"),
        "error names the program: {error}"
    );
    // The run aborted before any trial could be scored.
    assert_eq!(trials_finished(&events), 0);
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, CheckEvent::CheckFinished { .. })),
        "no verdict is reached on a launch failure"
    );
}
