//! # partzip
//!
//! Plans size-bounded archives for the files of a directory and drives the
//! 7-Zip command line to create them.
//!
//! The crate never touches archive bytes. It lists the files of a directory,
//! sorts them in natural order, decides how many parts are needed so that no
//! part exceeds a maximum size, and hands the resulting requests to the
//! external archiver one at a time.
//!
//! ## Quick Start
//!
//! ### Planning Without Running Anything
//!
//! ```rust,no_run
//! use partzip::{Config, Pipeline, Result, SplitMode};
//!
//! fn main() -> Result<()> {
//!     let config = Config::builder("/data/photos")
//!         .mode(SplitMode::Standalone)
//!         .max_split_mb(700)
//!         .build()?;
//!
//!     let plan = Pipeline::new(config).plan()?;
//!     for request in &plan.requests {
//!         println!("{}: {} files", request.destination.display(), request.files.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Creating the Archives
//!
//! ```rust,no_run
//! use partzip::{AutoConfirm, Config, NoProgress, Pipeline, Result};
//!
//! fn main() -> Result<()> {
//!     let config = Config::builder("/data/photos").max_split_mb(300).build()?;
//!     let pipeline = Pipeline::new(config);
//!     let mut invoker = pipeline.config().invoker();
//!
//!     let report = pipeline.run(&mut invoker, &mut AutoConfirm, &mut NoProgress)?;
//!     println!("{} invocation(s), {} failed", report.invocations(), report.failures());
//!     Ok(())
//! }
//! ```
//!
//! ## Modes
//!
//! | Mode | Archives | How the size is bounded |
//! |------|----------|-------------------------|
//! | [`SplitMode::Volume`] | one | 7-Zip cuts the output into `archive.zip.001`, `.002`, ... |
//! | [`SplitMode::Standalone`] | one per part | the file list is divided into contiguous groups |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | Yes | Command-line interface tool |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cancel;
pub mod config;
pub mod confirm;
pub mod enumerate;
pub mod error;
pub mod invoke;
pub mod natural;
pub mod partition;
pub mod pipeline;
pub mod progress;
pub mod size;
pub mod volume;

pub use error::{Error, Result};

// Re-export the run API at crate root for convenience
pub use cancel::CancelFlag;
pub use config::{Config, ConfigBuilder, DEFAULT_SPLIT_MB};
pub use pipeline::{Pipeline, Plan, RunReport, RunStatus};

// Re-export planning types
pub use enumerate::{ExtensionFilter, FileEntry, FileSet, ScanOptions};
pub use partition::{ArchiveFormat, ArchiveNaming, ArchiveRequest, SplitMode, SplitPlan};
pub use size::{FallbackPolicy, SplitSize};
pub use volume::VolumeThreshold;

// Re-export invocation API
pub use confirm::{AutoConfirm, ConfirmFn, Confirmation};
pub use invoke::{
    ArchiveInvoker, CommandLine, InvocationOutcome, InvocationStatus, SevenZip, ToolLocator,
};
pub use progress::{NoProgress, ProgressReporter, StatisticsProgress};
