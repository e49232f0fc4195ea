//! Turning a sorted file set into archive requests.
//!
//! Two strategies exist, selected by [`SplitMode`]:
//!
//! - [`SplitMode::Volume`]: one archive holding every file; the plan's part
//!   size becomes the archiver's volume threshold.
//! - [`SplitMode::Standalone`]: the file list itself is cut into contiguous
//!   groups, one independent archive per group.
//!
//! ```rust
//! use partzip::enumerate::{FileEntry, FileSet};
//! use partzip::partition::{ArchiveNaming, SplitMode, SplitPlan, partition};
//! use partzip::size::FallbackPolicy;
//!
//! let files = FileSet::from_unsorted(
//!     (1..=10).map(|i| FileEntry::new(format!("f{i}").into(), 100 << 20)).collect(),
//! );
//! let plan = SplitPlan::derive(files.total_mb(), 300, SplitMode::Standalone, FallbackPolicy::Lenient)?;
//! assert_eq!(plan.part_count, 4);
//!
//! let requests = partition(&files, &plan, &ArchiveNaming::zip("/data/photos"))?;
//! let sizes: Vec<_> = requests.iter().map(|r| r.files.len()).collect();
//! assert_eq!(sizes, [3, 3, 3, 1]);
//! # Ok::<(), partzip::Error>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::enumerate::{FileEntry, FileSet};
use crate::size::{self, FallbackPolicy};
use crate::volume::VolumeThreshold;
use crate::{Error, Result};

/// How the output is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// One archive, cut by the archiver into fixed-size volumes.
    #[default]
    Volume,
    /// Several independent archives, each holding a slice of the files.
    Standalone,
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volume => write!(f, "volume"),
            Self::Standalone => write!(f, "standalone"),
        }
    }
}

/// Part count and part size for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPlan {
    /// Number of parts, at least 1.
    pub part_count: u32,
    /// Size of each part in MB, at least 1.
    pub part_size_mb: u64,
    /// Strategy used to realise the parts.
    pub mode: SplitMode,
}

impl SplitPlan {
    /// Derives the plan for `total_mb` of input bounded by `max_split_mb`.
    ///
    /// # Errors
    ///
    /// See [`size::compute`].
    pub fn derive(
        total_mb: u64,
        max_split_mb: u64,
        mode: SplitMode,
        policy: FallbackPolicy,
    ) -> Result<Self> {
        let split = size::compute(total_mb, max_split_mb, policy)?;
        Ok(Self {
            part_count: split.part_count,
            part_size_mb: split.part_size_mb,
            mode,
        })
    }
}

/// Archive container type, which 7-Zip infers from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFormat {
    /// `.zip`
    #[default]
    Zip,
    /// `.7z`
    SevenZ,
}

impl ArchiveFormat {
    /// Returns the file extension, without a dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::SevenZ => "7z",
        }
    }
}

/// Derives archive paths from the source directory.
///
/// The archive is written next to the directory: `/data/photos` becomes
/// `/data/photos.zip`, or `/data/photos - Part 2.zip` for the second
/// standalone part.
#[derive(Debug, Clone)]
pub struct ArchiveNaming {
    base: PathBuf,
    format: ArchiveFormat,
}

impl ArchiveNaming {
    /// Creates naming for archives of `source_dir` in the given format.
    pub fn new(source_dir: impl AsRef<Path>, format: ArchiveFormat) -> Self {
        Self {
            base: source_dir.as_ref().to_path_buf(),
            format,
        }
    }

    /// Shorthand for [`ArchiveFormat::Zip`] naming.
    pub fn zip(source_dir: impl AsRef<Path>) -> Self {
        Self::new(source_dir, ArchiveFormat::Zip)
    }

    /// Returns the archive path, with a part suffix when `ordinal` is set.
    pub fn destination(&self, ordinal: Option<usize>) -> PathBuf {
        let base = self.base.to_string_lossy();
        let ext = self.format.extension();
        match ordinal {
            Some(n) => PathBuf::from(format!("{} - Part {}.{}", base, n, ext)),
            None => PathBuf::from(format!("{}.{}", base, ext)),
        }
    }
}

/// One archive the archiver is asked to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Path of the archive to create.
    pub destination: PathBuf,
    /// 1-based part number for standalone archives.
    pub ordinal: Option<usize>,
    /// Volume size for volume-split archives.
    pub volume: Option<VolumeThreshold>,
    /// Files to put into the archive, in order.
    pub files: Vec<PathBuf>,
    /// Combined size of `files` in bytes.
    pub total_bytes: u64,
}

impl ArchiveRequest {
    fn from_entries(
        destination: PathBuf,
        ordinal: Option<usize>,
        volume: Option<VolumeThreshold>,
        entries: &[FileEntry],
    ) -> Self {
        Self {
            destination,
            ordinal,
            volume,
            files: entries.iter().map(|e| e.path.clone()).collect(),
            total_bytes: entries.iter().map(|e| e.size).sum(),
        }
    }
}

/// Splits `files` according to `plan`.
///
/// Standalone groups hold `ceil(len / part_count)` files each, except the
/// last which holds the remainder. Groups that would be empty are dropped,
/// so fewer requests than `part_count` may come back when there are few
/// files.
///
/// # Errors
///
/// [`Error::EmptyFileSet`] when `files` is empty.
pub fn partition(
    files: &FileSet,
    plan: &SplitPlan,
    naming: &ArchiveNaming,
) -> Result<Vec<ArchiveRequest>> {
    if files.is_empty() {
        return Err(Error::EmptyFileSet);
    }

    let requests = match plan.mode {
        SplitMode::Volume => vec![ArchiveRequest::from_entries(
            naming.destination(None),
            None,
            Some(VolumeThreshold::new(plan.part_size_mb)),
            files.entries(),
        )],
        SplitMode::Standalone => {
            let parts = plan.part_count.max(1) as usize;
            let group_size = files.len().div_ceil(parts);
            files
                .entries()
                .chunks(group_size)
                .enumerate()
                .map(|(i, group)| {
                    let ordinal = i + 1;
                    ArchiveRequest::from_entries(
                        naming.destination(Some(ordinal)),
                        Some(ordinal),
                        None,
                        group,
                    )
                })
                .collect()
        }
    };

    Ok(requests)
}
