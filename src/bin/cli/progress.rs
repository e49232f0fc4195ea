//! Run progress display for CLI operations.
//!
//! The archiver writes to the same terminal, so progress is printed as
//! separator blocks around each run rather than as a live bar.

use partzip::{ArchiveRequest, InvocationOutcome, InvocationStatus, Plan, ProgressReporter};

use crate::output::{HumanFormatter, OutputFormatter, humanize_bytes};

const SEPARATOR: &str = "---------------------------------------";

/// Progress display for a pipeline run
pub struct CliProgress {
    quiet: bool,
}

impl CliProgress {
    /// Creates a new progress display; a quiet display prints nothing
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressReporter for CliProgress {
    fn on_plan(&mut self, plan: &Plan) {
        if !self.quiet {
            print!("{}", HumanFormatter.format_plan(plan));
        }
    }

    fn on_archive_start(&mut self, index: usize, total: usize, request: &ArchiveRequest) {
        if self.quiet {
            return;
        }
        println!("\n{}", SEPARATOR);
        println!(
            "\nCreating archive ({}/{}): {}",
            index + 1,
            total,
            request.destination.display()
        );
        println!(
            "  {} files, {}",
            request.files.len(),
            humanize_bytes(request.total_bytes)
        );
    }

    fn on_archive_complete(&mut self, _request: &ArchiveRequest, outcome: &InvocationOutcome) {
        if self.quiet {
            return;
        }
        if outcome.status == InvocationStatus::DryRun {
            println!("\n{}", outcome.command);
        }
        println!("\n{}\n", SEPARATOR);
    }

    fn on_warning(&mut self, message: &str) {
        eprintln!("Warning: {}", message);
    }
}
