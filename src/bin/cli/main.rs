//! CLI tool for partzip.

mod commands;
mod exit_codes;
mod output;
mod progress;
mod prompt;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;
use partzip::{ArchiveFormat, CancelFlag, SplitMode};

/// Compress the files of a directory into size-bounded archives with 7-Zip
#[derive(Parser)]
#[command(name = "partzip")]
#[command(author, version, long_about = None)]
#[command(
    about = "Compress all files in a directory (optionally its subdirectories) into size-bounded archives using 7z"
)]
pub struct Cli {
    /// Directory whose files are archived
    #[arg(short = 'd', long, value_name = "PATH", required_unless_present = "completions")]
    dir: Option<PathBuf>,

    /// Create one archive split into volumes of at most this many MB
    #[arg(
        short = 's',
        long,
        value_name = "MB",
        num_args = 0..=1,
        default_missing_value = "300",
        value_parser = clap::value_parser!(u64).range(1..),
        conflicts_with = "standalone"
    )]
    split: Option<u64>,

    /// Create several independent archives of at most this many MB each
    #[arg(
        long,
        visible_alias = "sa",
        value_name = "MB",
        num_args = 0..=1,
        default_missing_value = "300",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    standalone: Option<u64>,

    /// Use the default absolute path of 7z instead of searching PATH
    #[arg(short = 'a', long)]
    abs: bool,

    /// Path of the 7z executable (overrides --abs)
    #[arg(long, value_name = "PATH", env = "PARTZIP_7Z")]
    tool: Option<PathBuf>,

    /// Include files in all subdirectories
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Comma separated file extensions to include (e.g. "mp4,mkv" or "pdf,")
    #[arg(short = 'e', long, value_name = "CSV")]
    extensions: Option<String>,

    /// Dry run: show the plan and commands without writing anything
    #[arg(long)]
    dry: bool,

    /// Do not ask before creating the next archive (long form only: `-y` was the
    /// old dry-run flag)
    #[arg(long)]
    yes: bool,

    /// Fail instead of creating one oversized archive when no split fits
    #[arg(long)]
    strict: bool,

    /// Archive container format
    #[arg(long, value_enum, default_value = "zip")]
    archive_format: ArchiveKind,

    /// Kill an archiver run that takes longer than this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Suppress informational output
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ArchiveKind {
    Zip,
    #[value(name = "7z")]
    SevenZ,
}

impl From<ArchiveKind> for ArchiveFormat {
    fn from(kind: ArchiveKind) -> Self {
        match kind {
            ArchiveKind::Zip => ArchiveFormat::Zip,
            ArchiveKind::SevenZ => ArchiveFormat::SevenZ,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        std::process::exit(ExitCode::Success.code());
    }

    init_logging(cli.verbose);

    let (mode, max_split_mb) = match (cli.split, cli.standalone) {
        (Some(mb), _) => (SplitMode::Volume, mb),
        (None, Some(mb)) => (SplitMode::Standalone, mb),
        (None, None) => Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "one of --split or --standalone is required",
            )
            .exit(),
    };

    // First Ctrl+C stops after the running archiver returns, the second exits.
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || {
        if handler_flag.cancel() {
            eprintln!("\nInterrupted");
            std::process::exit(exit_codes::USER_INTERRUPT);
        }
        eprintln!("\nStopping after the current archive (press Ctrl+C again to abort)");
    })
    .ok();

    let Some(dir) = cli.dir else {
        // clap enforces --dir unless --completions was given.
        std::process::exit(ExitCode::BadArgs.code());
    };

    let exit_code = commands::run(
        &commands::RunConfig {
            dir: &dir,
            mode,
            max_split_mb,
            abs: cli.abs,
            tool: cli.tool.as_deref(),
            recursive: cli.recursive,
            extensions: cli.extensions.as_deref(),
            dry_run: cli.dry,
            yes: cli.yes,
            strict: cli.strict,
            archive_format: cli.archive_format.into(),
            timeout_secs: cli.timeout,
            format: cli.format,
            quiet: cli.quiet,
        },
        cancel,
    );

    std::process::exit(exit_code.code());
}
