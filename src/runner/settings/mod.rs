//! Configuration structures for build runs.
//!
//! This module provides the immutable [`BuildRunContext`] handed to the
//! runner, the builder that validates it, and the flavor/architecture types.

mod arch;
mod builder;
mod context;
mod flavor;

// Re-export all public types
pub use arch::TargetArch;
pub use builder::{BuildRunContextBuilder, DEFAULT_COOK_COMMAND, DEFAULT_PLATFORM};
pub use context::{BuildRunContext, DEFAULT_VERSION_KEY, DEFAULT_VERSION_SECTION};
pub use flavor::BuildFlavor;
