//! Progress reporting for pipeline runs.
//!
//! A [`ProgressReporter`] is told about the plan and about every archive as
//! it is started and finished. All methods have empty defaults, so an
//! implementation only overrides what it displays.
//!
//! # Example
//!
//! ```rust
//! use partzip::progress::{ProgressReporter, StatisticsProgress};
//!
//! let mut progress = StatisticsProgress::new();
//! progress.on_warning("archiver exited with status 2");
//! assert_eq!(progress.warnings.len(), 1);
//! ```

use crate::invoke::InvocationOutcome;
use crate::partition::ArchiveRequest;
use crate::pipeline::Plan;

/// Progress reporting trait for pipeline runs.
pub trait ProgressReporter {
    /// Called once after planning, before the first invocation.
    fn on_plan(&mut self, plan: &Plan) {
        let _ = plan;
    }

    /// Called before `request` is handed to the archiver.
    ///
    /// `index` is 0-based; `total` is the number of requests in the plan.
    fn on_archive_start(&mut self, index: usize, total: usize, request: &ArchiveRequest) {
        let _ = (index, total, request);
    }

    /// Called after the archiver returned for `request`.
    fn on_archive_complete(&mut self, request: &ArchiveRequest, outcome: &InvocationOutcome) {
        let _ = (request, outcome);
    }

    /// Called on any warning during the run.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }
}

/// A progress reporter that does nothing (null object pattern).
#[derive(Debug, Default, Clone)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// A progress reporter that collects statistics.
#[derive(Debug, Default, Clone)]
pub struct StatisticsProgress {
    /// Number of archives in the plan.
    pub archives_planned: usize,
    /// Number of archives handed to the archiver.
    pub archives_started: usize,
    /// Number of invocations that returned a non-zero status.
    pub archives_failed: usize,
    /// Bytes of input handed to the archiver so far.
    pub bytes_submitted: u64,
    /// Destinations in the order they were started.
    pub destinations: Vec<String>,
    /// Warnings collected.
    pub warnings: Vec<String>,
}

impl StatisticsProgress {
    /// Creates a new statistics progress reporter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for StatisticsProgress {
    fn on_plan(&mut self, plan: &Plan) {
        self.archives_planned = plan.requests.len();
    }

    fn on_archive_start(&mut self, _index: usize, _total: usize, request: &ArchiveRequest) {
        self.archives_started += 1;
        self.bytes_submitted += request.total_bytes;
        self.destinations
            .push(request.destination.to_string_lossy().into_owned());
    }

    fn on_archive_complete(&mut self, _request: &ArchiveRequest, outcome: &InvocationOutcome) {
        if !outcome.is_ok() {
            self.archives_failed += 1;
        }
    }

    fn on_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &mut P {
    fn on_plan(&mut self, plan: &Plan) {
        (**self).on_plan(plan);
    }

    fn on_archive_start(&mut self, index: usize, total: usize, request: &ArchiveRequest) {
        (**self).on_archive_start(index, total, request);
    }

    fn on_archive_complete(&mut self, request: &ArchiveRequest, outcome: &InvocationOutcome) {
        (**self).on_archive_complete(request, outcome);
    }

    fn on_warning(&mut self, message: &str) {
        (**self).on_warning(message);
    }
}
