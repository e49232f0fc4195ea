//! Exit codes for the CLI tool.

use partzip::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// An archiver run failed or the user stopped the run
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    IoError,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::IoError => IO_ERROR,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a partzip error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::InvalidPath { .. } => ExitCode::BadArgs,
        Error::InvalidExtensionList(_) => ExitCode::BadArgs,
        Error::InvalidSize { .. } => ExitCode::BadArgs,
        Error::EmptyFileSet => ExitCode::Success,
        Error::SizeConstraint { .. } => ExitCode::FatalError,
        Error::ToolLaunch { .. } => ExitCode::FatalError,
        Error::Timeout { .. } => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
