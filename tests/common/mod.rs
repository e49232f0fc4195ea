//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use partzip::{
    ArchiveInvoker, ArchiveRequest, CommandLine, InvocationOutcome, InvocationStatus, Result,
};
use tempfile::TempDir;

/// One MB, the unit all plans are expressed in.
pub const MB: u64 = 1 << 20;

/// Creates a temporary directory holding sparse files of the given sizes.
///
/// Names may contain `/` to place files in subdirectories.
pub fn source_dir(files: &[(&str, u64)]) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    for (name, size) in files {
        create_file(temp.path(), name, *size);
    }
    temp
}

/// Creates a sparse file of `size` bytes under `root`.
pub fn create_file(root: &Path, name: &str, size: u64) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    let file = File::create(&path).expect("Failed to create file");
    file.set_len(size).expect("Failed to size file");
    path
}

/// Returns the file names of `paths`, in order.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Invoker that records requests instead of running anything.
///
/// Exit codes are taken from `exit_codes` in order; once exhausted every
/// invocation succeeds.
#[derive(Debug, Default)]
pub struct RecordingInvoker {
    pub requests: Vec<ArchiveRequest>,
    pub exit_codes: Vec<i32>,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_codes(exit_codes: &[i32]) -> Self {
        Self {
            requests: Vec::new(),
            exit_codes: exit_codes.to_vec(),
        }
    }
}

impl ArchiveInvoker for RecordingInvoker {
    fn invoke(&mut self, request: &ArchiveRequest) -> Result<InvocationOutcome> {
        let code = self.exit_codes.get(self.requests.len()).copied().unwrap_or(0);
        self.requests.push(request.clone());
        Ok(InvocationOutcome {
            command: CommandLine::for_request(PathBuf::from("7z"), request),
            status: InvocationStatus::Exited(Some(code)),
            elapsed: Duration::ZERO,
        })
    }
}
