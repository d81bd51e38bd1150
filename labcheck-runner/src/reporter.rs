// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console reporting for checking runs.
//!
//! The runner emits [`CheckEvent`]s; this module renders them: a header line
//! per part, a progress bar advancing once per trial, a diagnostic line per
//! timeout, and a colored verdict. The progress bar is drawn on stderr while
//! messages go to the injected writer, so the two never tear each other.

use crate::events::CheckEvent;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use std::{io, time::Duration};

#[derive(Debug, Default)]
struct Styles {
    count: Style,
    pass: Style,
    fail: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
    }
}

/// Renders [`CheckEvent`]s to the console.
pub struct CheckReporter<W> {
    writer: W,
    styles: Box<Styles>,
    progress: Option<ProgressBar>,
    hide_progress_bar: bool,
}

impl<W: io::Write> CheckReporter<W> {
    /// Creates a reporter writing messages to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            styles: Box::default(),
            progress: None,
            hide_progress_bar: false,
        }
    }

    /// Enables colored output for the verdict and summary lines.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Hides the progress bar. Timeouts, the summary, and the verdict are
    /// still printed. Used when stderr is not a terminal and in tests.
    pub fn hide_progress_bar(&mut self) {
        self.hide_progress_bar = true;
    }

    /// Renders one event.
    pub fn report_event(&mut self, event: CheckEvent) -> io::Result<()> {
        match event {
            CheckEvent::CheckStarted { program, trials } => {
                writeln!(self.writer, "Checking {program} ({trials} trials)...")?;
                self.writer.flush()?;

                let bar = ProgressBar::new(trials as u64);
                bar.set_style(progress_bar_style());
                bar.set_prefix("Trials");
                if self.hide_progress_bar {
                    bar.set_draw_target(ProgressDrawTarget::hidden());
                } else {
                    // Tick 10 times a second so the elapsed display stays
                    // live during long trials.
                    bar.enable_steady_tick(Duration::from_millis(100));
                }
                self.progress = Some(bar);
            }
            CheckEvent::TrialTimeout { trial } => {
                writeln!(self.writer, "Timeout! (trial {})", trial + 1)?;
                self.writer.flush()?;
            }
            CheckEvent::TrialFinished { .. } => {
                if let Some(bar) = &self.progress {
                    bar.inc(1);
                }
            }
            CheckEvent::CheckFinished {
                stats,
                verdict,
                threshold,
                elapsed,
            } => {
                if let Some(bar) = self.progress.take() {
                    bar.finish_and_clear();
                }

                writeln!(
                    self.writer,
                    "You passed {} of {} runs ({:.1}%) in {:.2?}",
                    stats.successes.style(self.styles.count),
                    stats.attempted.style(self.styles.count),
                    stats.ratio() * 100.0,
                    elapsed,
                )?;
                if verdict {
                    writeln!(self.writer, "{}", "Success! Good job".style(self.styles.pass))?;
                } else {
                    writeln!(self.writer, "{}", "Not quite".style(self.styles.fail))?;
                    writeln!(
                        self.writer,
                        "We consider a success for this part to be {:.1}%",
                        threshold * 100.0,
                    )?;
                }
                self.writer.flush()?;
            }
        }
        Ok(())
    }
}

fn progress_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .progress_chars("=> ")
        .template("{prefix:>8} [{elapsed_precise:>9}] {wide_bar} {pos}/{len}")
        .expect("template is known to be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::RunStats;
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;

    fn render(events: Vec<CheckEvent>) -> String {
        let mut buf = Vec::new();
        {
            let mut reporter = CheckReporter::new(&mut buf);
            reporter.hide_progress_bar();
            for event in events {
                reporter
                    .report_event(event)
                    .expect("writing to a buffer is infallible");
            }
        }
        String::from_utf8(buf).expect("reporter output is UTF-8")
    }

    #[test]
    fn passing_run_output() {
        let out = render(vec![
            CheckEvent::CheckStarted {
                program: Utf8PathBuf::from("part1"),
                trials: 5,
            },
            CheckEvent::CheckFinished {
                stats: RunStats {
                    requested: 5,
                    attempted: 5,
                    successes: 4,
                },
                verdict: true,
                threshold: 0.80,
                elapsed: Duration::from_millis(1234),
            },
        ]);

        assert_eq!(
            out,
            "Checking part1 (5 trials)...\n\
             You passed 4 of 5 runs (80.0%) in 1.23s\n\
             Success! Good job\n"
        );
    }

    #[test]
    fn failing_run_states_required_threshold() {
        let out = render(vec![
            CheckEvent::CheckStarted {
                program: Utf8PathBuf::from("part2"),
                trials: 5,
            },
            CheckEvent::TrialTimeout { trial: 2 },
            CheckEvent::CheckFinished {
                stats: RunStats {
                    requested: 5,
                    attempted: 5,
                    successes: 3,
                },
                verdict: false,
                threshold: 0.80,
                elapsed: Duration::from_secs(2),
            },
        ]);

        assert_eq!(
            out,
            "Checking part2 (5 trials)...\n\
             Timeout! (trial 3)\n\
             You passed 3 of 5 runs (60.0%) in 2.00s\n\
             Not quite\n\
             We consider a success for this part to be 80.0%\n"
        );
    }
}
