// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing and dispatch.

use crate::output::{clap_styles, OutputOpts};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use labcheck_runner::{reporter::CheckReporter, runner::CheckRunner, spec::CheckSpec};
use std::{
    io::{self, IsTerminal},
    time::Duration,
};

/// Check your lab code.
///
/// Runs each part's program repeatedly from the current directory and grades
/// the observed success rate against that part's threshold.
#[derive(Debug, Parser)]
#[command(version, styles = clap_styles::style())]
pub struct LabcheckApp {
    /// Which part to check? 1, 2, 3, or all
    #[arg(value_enum, value_name = "PART")]
    part: PartSelector,

    #[command(flatten)]
    output: OutputOpts,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum PartSelector {
    #[value(name = "1")]
    Part1,
    #[value(name = "2")]
    Part2,
    #[value(name = "3")]
    Part3,
    /// Every part, in sequence
    All,
}

impl LabcheckApp {
    /// Executes the app.
    ///
    /// A failed verdict is reported but does not produce an error: the exit
    /// status reflects operational failures (an unlaunchable program), not
    /// the grade.
    pub fn exec(self) -> Result<()> {
        let cx = self.output.init();

        let runner = CheckRunner::new().wrap_err("error building check runner")?;
        let mut reporter = CheckReporter::new(io::stdout());
        if cx.color.should_colorize(supports_color::Stream::Stdout) {
            reporter.colorize();
        }
        if !io::stderr().is_terminal() {
            reporter.hide_progress_bar();
        }

        for (name, spec) in selected_parts(self.part) {
            let mut report_error = None;
            let run = runner
                .execute(&spec, |event| {
                    if let Err(error) = reporter.report_event(event) {
                        report_error.get_or_insert(error);
                    }
                })
                .wrap_err_with(|| format!("error checking {name}"))?;
            if let Some(error) = report_error {
                return Err(error).wrap_err("error writing to the console");
            }
            tracing::debug!(
                name,
                successes = run.stats.successes,
                attempted = run.stats.attempted,
                verdict = run.verdict,
                "part checked"
            );
        }
        Ok(())
    }
}

/// The fixed table of checkable parts.
///
/// These constants are chosen by the grading authority and are deliberately
/// not exposed as flags. Don't expect the hardcoded secrets to be the same
/// when we grade!
fn all_parts() -> Vec<(&'static str, CheckSpec)> {
    vec![
        (
            "part 1",
            CheckSpec::new("part1", &b"MIT{k3rn3l_m3m0r135}"[..])
                .with_trials(5)
                .with_threshold(0.80)
                .with_timeout(Duration::from_secs(30)),
        ),
        (
            "part 2",
            CheckSpec::new("part2", &b"MIT{scary_sp3ctr3!}"[..])
                .with_trials(5)
                .with_threshold(0.80)
                .with_timeout(Duration::from_secs(30)),
        ),
        (
            // The hardest part: one success in five long trials is enough,
            // and the run stops at the first hit.
            "part 3",
            CheckSpec::new("part3", &b"MIT{h4rd3st}"[..])
                .with_trials(5)
                .with_threshold(0.20)
                .with_timeout(Duration::from_secs(600))
                .with_pass_once(true),
        ),
    ]
}

fn selected_parts(selector: PartSelector) -> Vec<(&'static str, CheckSpec)> {
    let mut parts = all_parts();
    match selector {
        PartSelector::Part1 => vec![parts.remove(0)],
        PartSelector::Part2 => vec![parts.remove(1)],
        PartSelector::Part3 => vec![parts.remove(2)],
        PartSelector::All => parts,
    }
}
