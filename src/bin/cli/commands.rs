//! Command implementation for the CLI tool.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use partzip::{
    ArchiveFormat, AutoConfirm, CancelFlag, Config, Confirmation, FallbackPolicy, Pipeline,
    RunStatus, SplitMode, ToolLocator,
};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;
use crate::progress::CliProgress;
use crate::prompt::InteractivePrompt;

/// Configuration for a run.
pub struct RunConfig<'a> {
    pub dir: &'a Path,
    pub mode: SplitMode,
    pub max_split_mb: u64,
    pub abs: bool,
    pub tool: Option<&'a Path>,
    pub recursive: bool,
    pub extensions: Option<&'a str>,
    pub dry_run: bool,
    pub yes: bool,
    pub strict: bool,
    pub archive_format: ArchiveFormat,
    pub timeout_secs: Option<u64>,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl RunConfig<'_> {
    fn tool_locator(&self) -> ToolLocator {
        match (self.tool, self.abs) {
            (Some(path), _) => ToolLocator::Explicit(path.to_path_buf()),
            (None, true) => ToolLocator::Absolute,
            (None, false) => ToolLocator::SearchPath,
        }
    }

    fn to_config(&self) -> partzip::Result<Config> {
        let mut builder = Config::builder(self.dir)
            .mode(self.mode)
            .max_split_mb(self.max_split_mb)
            .fallback(if self.strict {
                FallbackPolicy::Strict
            } else {
                FallbackPolicy::Lenient
            })
            .recursive(self.recursive)
            .archive_format(self.archive_format)
            .tool(self.tool_locator())
            .dry_run(self.dry_run)
            .timeout(self.timeout_secs.map(Duration::from_secs));

        if let Some(list) = self.extensions {
            builder = builder.extensions(list);
        }

        builder.build()
    }

    fn confirmation(&self) -> Box<dyn Confirmation> {
        if self.yes || self.dry_run {
            return Box::new(AutoConfirm);
        }
        if !std::io::stdin().is_terminal() {
            log::info!("stdin is not a terminal; continuing without prompts");
            return Box::new(AutoConfirm);
        }
        Box::new(InteractivePrompt)
    }
}

/// Run command implementation
pub fn run(config: &RunConfig<'_>, cancel: CancelFlag) -> ExitCode {
    let formatter = create_formatter(config.format);

    let run_config = match config.to_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    let pipeline = Pipeline::new(run_config).with_cancel(cancel);
    let mut invoker = pipeline.config().invoker();
    let mut confirm = config.confirmation();
    // JSON output is printed once at the end; stdout carries nothing else.
    let mut progress = CliProgress::new(config.quiet || config.format == OutputFormat::Json);

    let report = match pipeline.run(&mut invoker, &mut confirm, &mut progress) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    if !config.quiet || config.format == OutputFormat::Json {
        print!("{}", formatter.format_report(&report));
    }

    match report.status {
        RunStatus::NothingToDo => ExitCode::Success,
        RunStatus::Completed if report.failures() == 0 => ExitCode::Success,
        RunStatus::Completed | RunStatus::Declined => ExitCode::Warning,
        RunStatus::Cancelled => ExitCode::UserInterrupt,
    }
}
