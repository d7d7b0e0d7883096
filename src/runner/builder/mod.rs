//! Build run orchestration and coordination.
//!
//! This module provides the [`BuildRunner`] state machine that takes a
//! project from a version bump to a compressed build.
//!
//! # Overview
//!
//! A run:
//! 1. Bumps `ProjectVersion` in `Config/DefaultGame.ini` (unless disabled)
//! 2. Creates `<output_root>/<version>`
//! 3. Invokes UAT `BuildCookRun` archiving into that directory
//! 4. Zips the packaged platform folder and checksums the archive
//! 5. Returns a [`RunReport`], or a [`RunFailure`] naming the failed phase
//!
//! # Module Organization
//!
//! - [`archive`] - Zip creation and archive naming
//! - [`checksum`] - SHA256 checksum calculation for archives
//! - [`lock`] - Advisory locks held for the duration of a run
//! - [`orchestrator`] - Main [`BuildRunner`] struct
//! - [`packager`] - UAT argument list and process execution
//! - [`state`] - Run states, reports and failures
//! - [`tool_detection`] - UAT launcher lookup
//! - [`versioning`] - Version entry read/bump on the project config

pub mod archive;
pub mod checksum;
pub mod lock;
mod orchestrator;
pub mod packager;
mod state;
pub mod tool_detection;
pub mod versioning;

pub use orchestrator::BuildRunner;
pub use state::{Phase, RunFailure, RunReport, RunState};
