// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [labcheck](https://crates.io/crates/labcheck).
//!
//! Lab solutions graded by labcheck are inherently probabilistic: a timing
//! side-channel attack recovers the secret only some fraction of the time.
//! This crate owns the trial-execution-and-scoring loop at the heart of the
//! checker: spawn the target program once per trial, bound the wait with a
//! wall-clock timeout, capture standard output, look for the expected secret,
//! and grade the aggregate pass rate against a threshold.

pub mod errors;
pub mod events;
pub mod reporter;
pub mod runner;
pub mod spec;
pub mod stats;
mod trial_command;
