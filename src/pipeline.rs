//! The end-to-end run: enumerate, sort, plan, partition, invoke.
//!
//! Everything up to and including partitioning happens in [`Pipeline::plan`]
//! and touches nothing but directory metadata. [`Pipeline::run`] then hands
//! the archive requests to an [`ArchiveInvoker`] one at a time; an
//! invocation always returns before the next one starts.
//!
//! ```rust,no_run
//! use partzip::{AutoConfirm, Config, NoProgress, Pipeline, SplitMode};
//!
//! let config = Config::builder("/data/photos")
//!     .mode(SplitMode::Standalone)
//!     .dry_run(true)
//!     .build()?;
//! let pipeline = Pipeline::new(config);
//! let mut invoker = pipeline.config().invoker();
//! let report = pipeline.run(&mut invoker, &mut AutoConfirm, &mut NoProgress)?;
//! for outcome in &report.outcomes {
//!     println!("{}", outcome.command);
//! }
//! # Ok::<(), partzip::Error>(())
//! ```

use std::path::PathBuf;

use crate::cancel::CancelFlag;
use crate::config::Config;
use crate::confirm::Confirmation;
use crate::enumerate::{self, FileSet};
use crate::invoke::{ArchiveInvoker, InvocationOutcome};
use crate::partition::{self, ArchiveRequest, SplitPlan};
use crate::progress::ProgressReporter;
use crate::{Error, Result};

/// Everything decided before the archiver runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Absolute source directory.
    pub source_dir: PathBuf,
    /// Number of files found.
    pub file_count: usize,
    /// Combined size of all files in bytes.
    pub total_bytes: u64,
    /// Combined size in whole MB, rounded up.
    pub total_mb: u64,
    /// Requested maximum part size in MB.
    pub max_split_mb: u64,
    /// Part count and size.
    pub split: SplitPlan,
    /// Archives to create, in order.
    pub requests: Vec<ArchiveRequest>,
}

impl Plan {
    /// Returns true when the single part exceeds the requested maximum.
    pub fn exceeds_maximum(&self) -> bool {
        self.split.part_size_mb > self.max_split_mb
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The directory held no matching files; nothing was invoked.
    NothingToDo,
    /// Every planned archive was handed to the archiver.
    Completed,
    /// The confirmation strategy stopped the run.
    Declined,
    /// The cancel flag was set.
    Cancelled,
}

/// The result of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The plan, absent when there was nothing to do.
    pub plan: Option<Plan>,
    /// One outcome per invoked request, in order.
    pub outcomes: Vec<InvocationOutcome>,
    /// How the run ended.
    pub status: RunStatus,
}

impl RunReport {
    fn nothing_to_do() -> Self {
        Self {
            plan: None,
            outcomes: Vec::new(),
            status: RunStatus::NothingToDo,
        }
    }

    /// Returns the number of invocations made.
    pub fn invocations(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the number of invocations whose archiver exited non-zero.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    /// Returns true when the run completed (or had nothing to do) without
    /// archiver failures.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, RunStatus::Completed | RunStatus::NothingToDo) && self.failures() == 0
    }
}

/// A configured run over one source directory.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    cancel: CancelFlag,
}

impl Pipeline {
    /// Creates a pipeline for `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Uses `cancel` to stop the run between invocations.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the cancel flag checked by [`run`](Self::run).
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Lists and sorts the files of the source directory.
    pub fn enumerate(&self) -> Result<FileSet> {
        enumerate::enumerate(self.config.source_dir(), self.config.scan())
    }

    /// Plans the run for an already enumerated file set.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyFileSet`] when `files` is empty.
    /// - [`Error::SizeConstraint`] under the strict fallback policy.
    pub fn plan_files(&self, files: &FileSet) -> Result<Plan> {
        if files.is_empty() {
            return Err(Error::EmptyFileSet);
        }

        let total_mb = files.total_mb();
        let split = SplitPlan::derive(
            total_mb,
            self.config.max_split_mb(),
            self.config.mode(),
            self.config.fallback(),
        )?;
        let requests = partition::partition(files, &split, &self.config.naming())?;

        log::debug!(
            "Planned {} {} archive(s) for {} files ({} MB, {} part(s) of {} MB)",
            requests.len(),
            split.mode,
            files.len(),
            total_mb,
            split.part_count,
            split.part_size_mb
        );

        Ok(Plan {
            source_dir: self.config.source_dir().to_path_buf(),
            file_count: files.len(),
            total_bytes: files.total_bytes(),
            total_mb,
            max_split_mb: self.config.max_split_mb(),
            split,
            requests,
        })
    }

    /// Enumerates the source directory and plans the run.
    ///
    /// # Errors
    ///
    /// See [`plan_files`](Self::plan_files); also [`Error::Io`] when file
    /// metadata cannot be read.
    pub fn plan(&self) -> Result<Plan> {
        let files = self.enumerate()?;
        self.plan_files(&files)
    }

    /// Plans the run and hands every request to `invoker`, in order.
    ///
    /// After each executed (non-dry) invocation that is followed by another
    /// request, `confirm` decides whether to continue. The cancel flag is
    /// checked before every invocation. An empty file set yields
    /// [`RunStatus::NothingToDo`] without any invocation.
    ///
    /// # Errors
    ///
    /// Planning errors are returned before anything is invoked. Errors from
    /// the invoker (launch failure, timeout) stop the run.
    pub fn run<I, C, P>(&self, invoker: &mut I, confirm: &mut C, progress: &mut P) -> Result<RunReport>
    where
        I: ArchiveInvoker + ?Sized,
        C: Confirmation + ?Sized,
        P: ProgressReporter + ?Sized,
    {
        let plan = match self.plan() {
            Ok(plan) => plan,
            Err(Error::EmptyFileSet) => {
                log::info!("No files in {}", self.config.source_dir().display());
                return Ok(RunReport::nothing_to_do());
            }
            Err(e) => return Err(e),
        };

        if plan.exceeds_maximum() {
            progress.on_warning(&format!(
                "{} MB cannot be split into parts of {} MB; creating a single part",
                plan.total_mb, plan.max_split_mb
            ));
        }
        progress.on_plan(&plan);

        let total = plan.requests.len();
        let mut outcomes: Vec<InvocationOutcome> = Vec::with_capacity(total);
        let mut status = RunStatus::Completed;

        for (index, request) in plan.requests.iter().enumerate() {
            if self.cancel.is_cancelled() {
                status = RunStatus::Cancelled;
                break;
            }

            let previous_executed = outcomes.last().is_some_and(|o| o.executed());
            if previous_executed {
                if !confirm.confirm(request)? {
                    status = RunStatus::Declined;
                    break;
                }
                // A prompt can be interrupted.
                if self.cancel.is_cancelled() {
                    status = RunStatus::Cancelled;
                    break;
                }
            }

            progress.on_archive_start(index, total, request);
            let outcome = invoker.invoke(request)?;
            if !outcome.is_ok() {
                progress.on_warning(&format!(
                    "{} exited with {:?} while creating {}",
                    outcome.command.program_name(),
                    outcome.status,
                    request.destination.display()
                ));
            }
            progress.on_archive_complete(request, &outcome);
            outcomes.push(outcome);
        }

        Ok(RunReport {
            plan: Some(plan),
            outcomes,
            status,
        })
    }
}
