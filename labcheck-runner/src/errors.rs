// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by labcheck.

use camino::{Utf8Path, Utf8PathBuf};
use std::{io, sync::Arc};
use thiserror::Error;

/// An error that occurred while launching the target program.
///
/// This aborts the remaining trials for the part being checked: if the
/// executable cannot be started once, running it again cannot succeed either.
/// Contrast with a trial timeout, which is absorbed into the statistics.
#[derive(Clone, Debug, Error)]
#[error("failed to launch `{program}`")]
pub struct LaunchError {
    program: Utf8PathBuf,
    #[source]
    error: Arc<io::Error>,
}

impl LaunchError {
    pub(crate) fn new(program: impl Into<Utf8PathBuf>, error: io::Error) -> Self {
        Self {
            program: program.into(),
            error: Arc::new(error),
        }
    }

    /// The program that could not be started.
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }
}

/// An error that occurred while building a [`CheckRunner`].
///
/// [`CheckRunner`]: crate::runner::CheckRunner
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerBuildError {
    /// Creating the tokio runtime failed.
    #[error("error creating tokio runtime")]
    TokioRuntimeCreate(#[source] io::Error),
}
