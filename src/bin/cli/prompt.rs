//! Interactive confirmation between archiver runs.

use dialoguer::Confirm;
use partzip::{ArchiveRequest, Confirmation};

/// Asks on the terminal before each following archive is created
pub struct InteractivePrompt;

impl Confirmation for InteractivePrompt {
    fn confirm(&mut self, next: &ArchiveRequest) -> partzip::Result<bool> {
        let answer = Confirm::new()
            .with_prompt(format!("Continue with {}?", next.destination.display()))
            .default(true)
            .interact();

        match answer {
            Ok(confirmed) => Ok(confirmed),
            Err(e) => Err(prompt_error(e)),
        }
    }
}

/// Terminal failures while prompting surface as I/O errors.
fn prompt_error(error: dialoguer::Error) -> partzip::Error {
    partzip::Error::Io(std::io::Error::other(error))
}
