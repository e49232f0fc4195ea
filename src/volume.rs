//! Volume-size threshold handed to the archiver.
//!
//! In volume mode the file list is not divided. Instead the archiver cuts its
//! own output stream into fixed-size files named `archive.zip.001`,
//! `archive.zip.002`, and so on. This module only describes that threshold;
//! the byte-level splitting is done by the archiver.
//!
//! # Example
//!
//! ```rust
//! use partzip::volume::VolumeThreshold;
//!
//! let threshold = VolumeThreshold::new(250);
//! assert_eq!(threshold.switch(), "-v250m");
//! assert_eq!(threshold.volume_path("photos.zip", 1).to_str().unwrap(), "photos.zip.001");
//! ```

use std::path::{Path, PathBuf};

/// Size of each output volume, in MB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeThreshold {
    megabytes: u64,
}

impl VolumeThreshold {
    /// Creates a threshold of `megabytes` MB per volume.
    pub fn new(megabytes: u64) -> Self {
        Self { megabytes }
    }

    /// Returns the volume size in MB.
    pub fn megabytes(&self) -> u64 {
        self.megabytes
    }

    /// Returns the archiver switch selecting this volume size.
    pub fn switch(&self) -> String {
        format!("-v{}m", self.megabytes)
    }

    /// Generates the path of a specific volume.
    ///
    /// Volume numbers are 1-indexed and formatted with 3 digits (e.g., 001, 002).
    ///
    /// ```rust
    /// use partzip::volume::VolumeThreshold;
    ///
    /// let threshold = VolumeThreshold::new(100);
    /// assert_eq!(threshold.volume_path("data.7z", 10).to_str().unwrap(), "data.7z.010");
    /// assert_eq!(threshold.volume_path("data.7z", 100).to_str().unwrap(), "data.7z.100");
    /// ```
    pub fn volume_path(&self, archive: impl AsRef<Path>, volume_number: u32) -> PathBuf {
        let base_str = archive.as_ref().to_string_lossy();
        PathBuf::from(format!("{}.{:03}", base_str, volume_number))
    }

    /// Upper bound on the number of volumes for `total_mb` of input.
    ///
    /// Compression usually makes the real count smaller.
    pub fn max_volumes(&self, total_mb: u64) -> u64 {
        if self.megabytes == 0 {
            return 1;
        }
        total_mb.div_ceil(self.megabytes).max(1)
    }
}
