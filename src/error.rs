//! Error types for archive planning and invocation.
//!
//! This module provides the [`Error`] enum which represents every failure
//! mode of a run, along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Planning errors ([`InvalidPath`], [`InvalidExtensionList`],
//! [`SizeConstraint`], [`InvalidSize`]) are raised before the archiver is
//! started, so a planning failure never leaves a partial archive behind.
//! [`EmptyFileSet`] is not fatal: [`Pipeline::run`] turns it into
//! [`RunStatus::NothingToDo`].
//!
//! ```rust,no_run
//! use partzip::{Config, Error, Pipeline, SplitMode};
//!
//! fn plan(dir: &str) -> partzip::Result<()> {
//!     let config = Config::builder(dir).mode(SplitMode::Standalone).build()?;
//!     match Pipeline::new(config).plan() {
//!         Ok(plan) => println!("{} archives", plan.requests.len()),
//!         Err(Error::EmptyFileSet) => println!("Nothing to do."),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`InvalidPath`]: Error::InvalidPath
//! [`InvalidExtensionList`]: Error::InvalidExtensionList
//! [`SizeConstraint`]: Error::SizeConstraint
//! [`InvalidSize`]: Error::InvalidSize
//! [`EmptyFileSet`]: Error::EmptyFileSet
//! [`Pipeline::run`]: crate::Pipeline::run
//! [`RunStatus::NothingToDo`]: crate::RunStatus::NothingToDo

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// The main error type for partzip operations.
///
/// # Error Categories
///
/// | Category | Variants | Detected |
/// |----------|----------|----------|
/// | Validation | [`InvalidPath`][Self::InvalidPath], [`InvalidExtensionList`][Self::InvalidExtensionList], [`InvalidSize`][Self::InvalidSize] | Before enumeration |
/// | Planning | [`EmptyFileSet`][Self::EmptyFileSet], [`SizeConstraint`][Self::SizeConstraint] | Before any invocation |
/// | Invocation | [`ToolLaunch`][Self::ToolLaunch], [`Timeout`][Self::Timeout] | While running the archiver |
/// | I/O | [`Io`][Self::Io] | Anywhere |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while inspecting the source directory.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source directory does not exist or is not a directory.
    #[error("Invalid directory path '{}': {reason}", path.display())]
    InvalidPath {
        /// The path as given.
        path: PathBuf,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The extension filter string could not be parsed.
    ///
    /// The string contains the offending input or item.
    #[error("Invalid extensions list: {0}")]
    InvalidExtensionList(String),

    /// Enumeration produced no files.
    ///
    /// This is not a failure of the run; it means there is nothing to do.
    #[error("Nothing to do.")]
    EmptyFileSet,

    /// No divisor in the supported range brings each part under the maximum.
    ///
    /// Only returned under [`FallbackPolicy::Strict`]; the lenient policy
    /// falls back to a single oversized part instead.
    ///
    /// [`FallbackPolicy::Strict`]: crate::size::FallbackPolicy::Strict
    #[error(
        "Cannot split {total_mb} MB into at most {max_parts} parts of {max_split_mb} MB or less"
    )]
    SizeConstraint {
        /// Total size of the file set in MB.
        total_mb: u64,
        /// Requested maximum part size in MB.
        max_split_mb: u64,
        /// Largest part count that was tried.
        max_parts: u32,
    },

    /// A size argument was zero.
    #[error("Invalid {what}: {value} MB")]
    InvalidSize {
        /// Which size was rejected.
        what: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// The archiver could not be started.
    #[error("Failed to launch '{program}': {source}")]
    ToolLaunch {
        /// The program that was executed.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The archiver did not finish within the configured timeout and was killed.
    #[error("'{program}' did not finish within {}s", after.as_secs())]
    Timeout {
        /// The program that was executed.
        program: String,
        /// The configured timeout.
        after: Duration,
    },
}

/// Result type alias for partzip operations.
pub type Result<T> = std::result::Result<T, Error>;
