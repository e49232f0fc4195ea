//! Run configuration.
//!
//! A [`Config`] is built once, validated, and then only read. Every component
//! of a run takes what it needs from it; nothing reads global state.
//!
//! ```rust,no_run
//! use partzip::{Config, FallbackPolicy, SplitMode};
//!
//! let config = Config::builder("/data/photos")
//!     .mode(SplitMode::Standalone)
//!     .max_split_mb(700)
//!     .recursive(true)
//!     .extensions("jpg,png")
//!     .fallback(FallbackPolicy::Strict)
//!     .build()?;
//! assert_eq!(config.max_split_mb(), 700);
//! # Ok::<(), partzip::Error>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enumerate::{ExtensionFilter, ScanOptions, resolve_source_dir};
use crate::invoke::{SevenZip, ToolLocator};
use crate::partition::{ArchiveFormat, ArchiveNaming, SplitMode};
use crate::size::FallbackPolicy;
use crate::{Error, Result};

/// Default maximum part size in MB.
pub const DEFAULT_SPLIT_MB: u64 = 300;

/// Validated, immutable configuration of one run.
#[derive(Debug, Clone)]
pub struct Config {
    source_dir: PathBuf,
    mode: SplitMode,
    max_split_mb: u64,
    fallback: FallbackPolicy,
    scan: ScanOptions,
    format: ArchiveFormat,
    tool: ToolLocator,
    dry_run: bool,
    timeout: Option<Duration>,
}

impl Config {
    /// Starts building a configuration for `source_dir`.
    pub fn builder(source_dir: impl AsRef<Path>) -> ConfigBuilder {
        ConfigBuilder::new(source_dir)
    }

    /// Returns the absolute source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Returns the output mode.
    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Returns the maximum part size in MB.
    pub fn max_split_mb(&self) -> u64 {
        self.max_split_mb
    }

    /// Returns the policy used when no split fits.
    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Returns the enumeration options.
    pub fn scan(&self) -> &ScanOptions {
        &self.scan
    }

    /// Returns the archive format.
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Returns where the archiver is looked up.
    pub fn tool(&self) -> &ToolLocator {
        &self.tool
    }

    /// Returns true when commands are only displayed.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the per-invocation timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the archive naming for the source directory.
    pub fn naming(&self) -> ArchiveNaming {
        ArchiveNaming::new(&self.source_dir, self.format)
    }

    /// Returns a 7-Zip invoker set up from this configuration.
    pub fn invoker(&self) -> SevenZip {
        SevenZip::new(self.tool.clone())
            .dry_run(self.dry_run)
            .timeout(self.timeout)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    source_dir: PathBuf,
    mode: SplitMode,
    max_split_mb: u64,
    fallback: FallbackPolicy,
    recursive: bool,
    extensions: Option<String>,
    format: ArchiveFormat,
    tool: ToolLocator,
    dry_run: bool,
    timeout: Option<Duration>,
}

impl ConfigBuilder {
    /// Creates a builder with default settings.
    pub fn new(source_dir: impl AsRef<Path>) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            mode: SplitMode::default(),
            max_split_mb: DEFAULT_SPLIT_MB,
            fallback: FallbackPolicy::default(),
            recursive: false,
            extensions: None,
            format: ArchiveFormat::default(),
            tool: ToolLocator::default(),
            dry_run: false,
            timeout: None,
        }
    }

    /// Sets the output mode.
    pub fn mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the maximum part size in MB.
    pub fn max_split_mb(mut self, max_split_mb: u64) -> Self {
        self.max_split_mb = max_split_mb;
        self
    }

    /// Sets the fallback policy.
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Includes files in subdirectories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Restricts enumeration to a comma separated extension list.
    pub fn extensions(mut self, list: impl Into<String>) -> Self {
        self.extensions = Some(list.into());
        self
    }

    /// Sets the archive format.
    pub fn archive_format(mut self, format: ArchiveFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets where the archiver is looked up.
    pub fn tool(mut self, tool: ToolLocator) -> Self {
        self.tool = tool;
        self
    }

    /// Only displays the commands.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the per-invocation timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the settings and builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if the source directory is not an existing directory.
    /// - [`Error::InvalidExtensionList`] if the extension list is malformed.
    /// - [`Error::InvalidSize`] if the maximum part size is zero.
    pub fn build(self) -> Result<Config> {
        let source_dir = resolve_source_dir(&self.source_dir)?;

        let extensions = self
            .extensions
            .as_deref()
            .map(ExtensionFilter::parse)
            .transpose()?;

        if self.max_split_mb == 0 {
            return Err(Error::InvalidSize {
                what: "maximum split size",
                value: 0,
            });
        }

        Ok(Config {
            source_dir,
            mode: self.mode,
            max_split_mb: self.max_split_mb,
            fallback: self.fallback,
            scan: ScanOptions {
                recursive: self.recursive,
                extensions,
            },
            format: self.format,
            tool: self.tool,
            dry_run: self.dry_run,
            timeout: self.timeout,
        })
    }
}
