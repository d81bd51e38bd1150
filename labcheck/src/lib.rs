// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! A probabilistic autograder for the lab's side-channel exercises.
//!
//! Invoke as `labcheck <PART>` where `PART` is `1`, `2`, `3`, or `all`. Each
//! part's target program is run repeatedly from the current directory and
//! graded on how often its output contains the expected secret. The core
//! loop lives in [`labcheck_runner`].

mod dispatch;
mod output;

pub use dispatch::LabcheckApp;
