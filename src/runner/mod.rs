//! Build runs for Unreal Engine projects.
//!
//! A run bumps the project's version entry, invokes the Unreal Automation
//! Tool's `BuildCookRun` into a per-version output directory and compresses
//! the packaged platform folder.
//!
//! # Example
//!
//! ```no_run
//! use ue_build_orchestrator::runner::{BuildFlavor, BuildRunContextBuilder, BuildRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let context = BuildRunContextBuilder::new()
//!     .project_name("MyGame")
//!     .project_root("/work/MyGame")
//!     .engine_root("/opt/UnrealEngine")
//!     .output_root("/builds/MyGame")
//!     .flavor(BuildFlavor::Shipping)
//!     .platform("Linux")
//!     .build()?;
//!
//! let report = BuildRunner::new(context).run().await?;
//! println!("SHA256: {}", report.archive_sha256);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod settings;
pub mod utils;

pub use builder::{BuildRunner, Phase, RunFailure, RunReport, RunState};
pub use error::{Error, ErrorKind, Result};
pub use settings::{
    BuildFlavor, BuildRunContext, BuildRunContextBuilder, DEFAULT_COOK_COMMAND, DEFAULT_PLATFORM,
    DEFAULT_VERSION_KEY, DEFAULT_VERSION_SECTION, TargetArch,
};
