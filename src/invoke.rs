//! Running the external archiver.
//!
//! The pipeline hands each [`ArchiveRequest`] to an [`ArchiveInvoker`]. The
//! provided implementation, [`SevenZip`], runs the 7-Zip command line:
//!
//! ```text
//! 7z a "<destination>" <file>... [-v<N>m]
//! ```
//!
//! When the file arguments would make the command line too long, the paths
//! are written to a temporary list file instead and passed as
//! `-scsUTF-8 @<list>`, one path per line in the same order.
//!
//! The archiver's stdout and stderr are inherited, so its own messages and
//! failures reach the user unchanged. A non-zero exit status is recorded in
//! the [`InvocationOutcome`], not turned into an error.

use std::ffi::OsString;
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

use crate::partition::ArchiveRequest;
use crate::{Error, Result};

/// Interval between checks on a running archiver when a timeout is set.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Largest combined length of inline file arguments, in bytes.
///
/// Windows limits a whole command line to 32767 characters.
pub const INLINE_ARGS_LIMIT: usize = 8 * 1024;

/// Switch telling 7-Zip that list files are UTF-8.
const LIST_CHARSET_SWITCH: &str = "-scsUTF-8";

/// Where to find the archiver executable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolLocator {
    /// Look the default program name up on `PATH`.
    #[default]
    SearchPath,
    /// Use the default installation path of 7-Zip.
    Absolute,
    /// Use this program.
    Explicit(PathBuf),
}

impl ToolLocator {
    /// Program name looked up on `PATH`.
    pub const DEFAULT_NAME: &'static str = if cfg!(windows) { "7z.exe" } else { "7z" };

    /// Default installation path of 7-Zip.
    pub const DEFAULT_ABSOLUTE: &'static str = if cfg!(windows) {
        r"C:\Program Files\7-Zip\7z.exe"
    } else {
        "/usr/bin/7z"
    };

    /// Returns the program to execute.
    pub fn program(&self) -> PathBuf {
        match self {
            Self::SearchPath => PathBuf::from(Self::DEFAULT_NAME),
            Self::Absolute => PathBuf::from(Self::DEFAULT_ABSOLUTE),
            Self::Explicit(path) => path.clone(),
        }
    }
}

/// A fully built archiver command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The program to run.
    pub program: PathBuf,
    /// Its arguments.
    pub args: Vec<OsString>,
    /// Files handed over through a list file; empty when they are in `args`.
    pub list_files: Vec<PathBuf>,
}

impl CommandLine {
    /// Builds the 7-Zip `a` (add) command for `request`.
    ///
    /// Files go on the command line while their combined length stays within
    /// [`INLINE_ARGS_LIMIT`]; otherwise they are collected in `list_files`.
    pub fn for_request(program: PathBuf, request: &ArchiveRequest) -> Self {
        let mut args = vec![
            OsString::from("a"),
            request.destination.clone().into_os_string(),
        ];
        let mut list_files = Vec::new();

        if fits_inline(&request.files) || !listable(&request.files) {
            args.extend(request.files.iter().map(|f| f.clone().into_os_string()));
        } else {
            args.push(OsString::from(LIST_CHARSET_SWITCH));
            list_files = request.files.clone();
        }

        if let Some(volume) = request.volume {
            args.push(OsString::from(volume.switch()));
        }
        Self {
            program,
            args,
            list_files,
        }
    }

    /// Returns true when the files are passed through a list file.
    pub fn uses_list_file(&self) -> bool {
        !self.list_files.is_empty()
    }

    /// Returns the program name for messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn to_command(&self, list_file: Option<&Path>) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(path) = list_file {
            let mut arg = OsString::from("@");
            arg.push(path);
            command.arg(arg);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}

fn fits_inline(files: &[PathBuf]) -> bool {
    let total: usize = files.iter().map(|f| f.as_os_str().len() + 1).sum();
    total <= INLINE_ARGS_LIMIT
}

/// A list file holds one UTF-8 path per line.
fn listable(files: &[PathBuf]) -> bool {
    files
        .iter()
        .all(|f| f.to_str().is_some_and(|s| !s.contains(['\n', '\r'])))
}

/// Writes `files` to a temporary list file, removed when dropped.
fn write_list_file(files: &[PathBuf]) -> Result<NamedTempFile> {
    let mut list = tempfile::Builder::new()
        .prefix("partzip-")
        .suffix(".lst")
        .tempfile()?;
    {
        let mut writer = BufWriter::new(list.as_file_mut());
        for file in files {
            writeln!(writer, "{}", file.display())?;
        }
        writer.flush()?;
    }
    Ok(list)
}

impl fmt::Display for CommandLine {
    /// Formats the command for display, quoting arguments that need it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        if self.uses_list_file() {
            write!(f, " @<list of {} files>", self.list_files.len())?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\\\""))
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    /// Nothing was executed.
    DryRun,
    /// The archiver exited; `None` when it was terminated by a signal.
    Exited(Option<i32>),
}

/// The result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// The command that was (or would have been) run.
    pub command: CommandLine,
    /// How it ended.
    pub status: InvocationStatus,
    /// Wall-clock time spent waiting for the archiver.
    pub elapsed: Duration,
}

impl InvocationOutcome {
    /// Returns true for a dry run or a zero exit status.
    pub fn is_ok(&self) -> bool {
        matches!(
            self.status,
            InvocationStatus::DryRun | InvocationStatus::Exited(Some(0))
        )
    }

    /// Returns true when the archiver actually ran.
    pub fn executed(&self) -> bool {
        !matches!(self.status, InvocationStatus::DryRun)
    }
}

/// Creates one archive per call.
///
/// Calls are made sequentially by the pipeline; an implementation is free to
/// keep state between them but the pipeline never relies on it.
pub trait ArchiveInvoker {
    /// Creates the archive described by `request`.
    fn invoke(&mut self, request: &ArchiveRequest) -> Result<InvocationOutcome>;
}

/// Runs the 7-Zip command line.
#[derive(Debug, Clone, Default)]
pub struct SevenZip {
    tool: ToolLocator,
    dry_run: bool,
    timeout: Option<Duration>,
}

impl SevenZip {
    /// Creates an invoker using `tool`.
    pub fn new(tool: ToolLocator) -> Self {
        Self {
            tool,
            dry_run: false,
            timeout: None,
        }
    }

    /// Only builds commands, never runs them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Kills an invocation that runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the command for `request` without running it.
    pub fn command_for(&self, request: &ArchiveRequest) -> CommandLine {
        CommandLine::for_request(self.tool.program(), request)
    }
}

impl ArchiveInvoker for SevenZip {
    fn invoke(&mut self, request: &ArchiveRequest) -> Result<InvocationOutcome> {
        let command = self.command_for(request);

        if self.dry_run {
            log::debug!("Dry run: {}", command);
            return Ok(InvocationOutcome {
                command,
                status: InvocationStatus::DryRun,
                elapsed: Duration::ZERO,
            });
        }

        log::debug!("Running: {}", command);
        let program = command.program_name();

        // Kept alive until the archiver has exited.
        let list_file = if command.uses_list_file() {
            let list = write_list_file(&command.list_files)?;
            log::debug!(
                "Passing {} files through {}",
                command.list_files.len(),
                list.path().display()
            );
            Some(list)
        } else {
            None
        };

        let started = Instant::now();
        let mut child = command
            .to_command(list_file.as_ref().map(|l| l.path()))
            .spawn()
            .map_err(|source| Error::ToolLaunch {
                program: program.clone(),
                source,
            })?;

        let status = match self.timeout {
            None => child.wait()?,
            Some(limit) => loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if started.elapsed() >= limit {
                    log::warn!("Killing '{}' after {}s", program, limit.as_secs());
                    // The process may have exited between the checks.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::Timeout {
                        program,
                        after: limit,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            },
        };

        let elapsed = started.elapsed();
        if !status.success() {
            log::warn!("'{}' exited with {}", program, status);
        }

        Ok(InvocationOutcome {
            command,
            status: InvocationStatus::Exited(status.code()),
            elapsed,
        })
    }
}
