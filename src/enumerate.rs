//! Source directory enumeration.
//!
//! Lists the regular files of a directory, optionally descending into
//! subdirectories and keeping only files with selected extensions, and
//! returns them as a naturally sorted [`FileSet`].

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::natural;
use crate::size::bytes_to_mb;
use crate::{Error, Result};

/// A file found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path of the file on disk.
    pub path: PathBuf,
    /// Size of the file in bytes.
    pub size: u64,
}

impl FileEntry {
    /// Creates a new entry.
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }

    /// Returns the file name without its last extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Files of one run in natural order.
///
/// The set is sorted once when built and never reordered afterwards.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    entries: Vec<FileEntry>,
}

impl FileSet {
    /// Builds a set from unsorted entries, sorting them naturally by stem.
    pub fn from_unsorted(mut entries: Vec<FileEntry>) -> Self {
        natural::sort_entries(&mut entries);
        Self { entries }
    }

    /// Returns the entries in order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set holds no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the sum of all file sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// Returns the total size in whole MB, rounded up.
    ///
    /// A non-empty set of empty files still counts as 1 MB so that a plan
    /// never carries a zero part size.
    pub fn total_mb(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            bytes_to_mb(self.total_bytes()).max(1)
        }
    }
}

/// Extensions a file name has to end with to be included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Parses a comma separated extension list such as `"mp4,mkv"` or `"pdf,"`.
    ///
    /// Whitespace around items and one leading dot per item are ignored, as
    /// are empty items.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidExtensionList`] when no extension remains or an item
    /// contains a path separator, whitespace or a wildcard.
    pub fn parse(list: &str) -> Result<Self> {
        let mut extensions = Vec::new();

        for item in list.split(',') {
            let item = item.trim();
            let item = item.strip_prefix('.').unwrap_or(item);
            if item.is_empty() {
                continue;
            }
            if item
                .chars()
                .any(|c| c == '/' || c == '\\' || c == '*' || c == '?' || c.is_whitespace())
            {
                return Err(Error::InvalidExtensionList(format!(
                    "'{}' is not a file extension",
                    item
                )));
            }
            extensions.push(item.to_string());
        }

        if extensions.is_empty() {
            return Err(Error::InvalidExtensionList(format!(
                "'{}' names no extensions",
                list
            )));
        }

        Ok(Self { extensions })
    }

    /// Returns the parsed extensions, without dots.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Checks whether a file name ends with `.<ext>` for one of the extensions.
    ///
    /// The comparison ignores ASCII case.
    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| {
            let suffix_len = ext.len() + 1;
            if file_name.len() <= suffix_len {
                return false;
            }
            let split = file_name.len() - suffix_len;
            if !file_name.is_char_boundary(split) {
                return false;
            }
            let suffix = &file_name[split..];
            suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(ext)
        })
    }
}

/// Validates that `path` is an existing directory and returns its absolute form.
///
/// # Errors
///
/// [`Error::InvalidPath`] when the path does not exist or is not a directory.
pub fn resolve_source_dir(path: &Path) -> Result<PathBuf> {
    let resolved = path.canonicalize().map_err(|_| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "does not exist",
    })?;
    if !resolved.is_dir() {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "not a directory",
        });
    }
    Ok(resolved)
}

/// How to list the files of a directory.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Keep only files with these extensions.
    pub extensions: Option<ExtensionFilter>,
}

/// Lists the regular files under `dir` and returns them naturally sorted.
///
/// Entries that cannot be read are skipped with a warning. Symbolic links
/// are not followed.
///
/// # Errors
///
/// [`Error::Io`] when the metadata of a listed file cannot be read.
pub fn enumerate(dir: &Path, options: &ScanOptions) -> Result<FileSet> {
    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(filter) = &options.extensions {
            let name = entry.file_name().to_string_lossy();
            if !filter.matches(&name) {
                continue;
            }
        }

        let size = entry.metadata().map_err(std::io::Error::from)?.len();
        entries.push(FileEntry::new(entry.into_path(), size));
    }

    log::debug!("Found {} files in {}", entries.len(), dir.display());

    Ok(FileSet::from_unsorted(entries))
}
