//! Output formatting for CLI operations.

use serde_json::{Value, json};
use partzip::{ArchiveRequest, InvocationStatus, Plan, RunReport, RunStatus, SplitMode};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the plan of a run
    fn format_plan(&self, plan: &Plan) -> String;

    /// Formats the final report of a run
    fn format_report(&self, report: &RunReport) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_plan(&self, plan: &Plan) -> String {
        let mut output = String::new();

        output.push_str(&format!("Source:      {}\n", plan.source_dir.display()));
        output.push_str(&format!(
            "Files:       {} ({})\n",
            plan.file_count,
            humanize_bytes(plan.total_bytes)
        ));

        match plan.split.mode {
            SplitMode::Volume => {
                let volumes = plan
                    .requests
                    .first()
                    .and_then(|r| r.volume)
                    .map(|v| v.max_volumes(plan.total_mb))
                    .unwrap_or(1);
                output.push_str(&format!(
                    "Mode:        one archive in volumes of {} MB (at most {} volumes)\n",
                    plan.split.part_size_mb, volumes
                ));
            }
            SplitMode::Standalone => {
                output.push_str(&format!(
                    "Mode:        {} standalone archive(s) of about {} MB\n",
                    plan.requests.len(),
                    plan.split.part_size_mb
                ));
            }
        }

        if plan.exceeds_maximum() {
            output.push_str(&format!(
                "Note:        {} MB does not fit into parts of {} MB\n",
                plan.total_mb, plan.max_split_mb
            ));
        }

        output
    }

    fn format_report(&self, report: &RunReport) -> String {
        let mut output = String::new();

        if report.status == RunStatus::NothingToDo {
            output.push_str("Nothing to do.\n");
            return output;
        }

        let dry = report
            .outcomes
            .iter()
            .all(|o| o.status == InvocationStatus::DryRun);

        if dry && !report.outcomes.is_empty() {
            output.push_str(&format!(
                "Dry run: {} command(s) not executed\n",
                report.invocations()
            ));
            return output;
        }

        match report.status {
            RunStatus::Completed if report.failures() == 0 => {
                output.push_str(&format!("Created {} archive(s)\n", report.invocations()));
            }
            RunStatus::Completed => {
                output.push_str(&format!(
                    "Finished with errors: {} of {} archiver run(s) failed\n",
                    report.failures(),
                    report.invocations()
                ));
            }
            RunStatus::Declined => {
                output.push_str(&format!(
                    "Stopped after {} archive(s)\n",
                    report.invocations()
                ));
            }
            RunStatus::Cancelled => {
                output.push_str(&format!(
                    "Cancelled after {} archive(s)\n",
                    report.invocations()
                ));
            }
            RunStatus::NothingToDo => {}
        }

        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

fn request_json(request: &ArchiveRequest) -> Value {
    json!({
        "destination": request.destination.to_string_lossy(),
        "part": request.ordinal,
        "volume_mb": request.volume.map(|v| v.megabytes()),
        "file_count": request.files.len(),
        "bytes": request.total_bytes,
        "files": request.files.iter().map(|f| f.to_string_lossy()).collect::<Vec<_>>(),
    })
}

fn plan_json(plan: &Plan) -> Value {
    json!({
        "source": plan.source_dir.to_string_lossy(),
        "file_count": plan.file_count,
        "total_bytes": plan.total_bytes,
        "total_mb": plan.total_mb,
        "max_split_mb": plan.max_split_mb,
        "mode": plan.split.mode.to_string(),
        "part_count": plan.split.part_count,
        "part_size_mb": plan.split.part_size_mb,
        "archives": plan.requests.iter().map(request_json).collect::<Vec<_>>(),
    })
}

fn status_name(status: RunStatus) -> &'static str {
    match status {
        RunStatus::NothingToDo => "nothing_to_do",
        RunStatus::Completed => "completed",
        RunStatus::Declined => "declined",
        RunStatus::Cancelled => "cancelled",
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, plan: &Plan) -> String {
        serde_json::to_string_pretty(&plan_json(plan)).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_report(&self, report: &RunReport) -> String {
        let outcomes: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| {
                let (executed, exit_code) = match o.status {
                    InvocationStatus::DryRun => (false, None),
                    InvocationStatus::Exited(code) => (true, code),
                };
                json!({
                    "command": o.command.to_string(),
                    "executed": executed,
                    "exit_code": exit_code,
                    "success": o.is_ok(),
                    "elapsed_ms": o.elapsed.as_millis() as u64,
                })
            })
            .collect();

        let obj = json!({
            "status": status_name(report.status),
            "success": report.is_ok(),
            "plan": report.plan.as_ref().map(plan_json),
            "invocations": outcomes,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
