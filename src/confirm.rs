//! Gating between invocations.
//!
//! After an archive has been written the pipeline asks a [`Confirmation`]
//! whether to go on with the next one. [`AutoConfirm`] always agrees; the
//! command-line tool supplies an interactive prompt.

use crate::partition::ArchiveRequest;
use crate::Result;

/// Decides whether the next archive should be created.
pub trait Confirmation {
    /// Called before `next` is handed to the archiver, after the previous
    /// archive has been written. Returning `Ok(false)` stops the run.
    fn confirm(&mut self, next: &ArchiveRequest) -> Result<bool>;
}

/// Confirms everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&mut self, _next: &ArchiveRequest) -> Result<bool> {
        Ok(true)
    }
}

/// Confirmation backed by a closure.
pub struct ConfirmFn<F> {
    callback: F,
}

impl<F> ConfirmFn<F>
where
    F: FnMut(&ArchiveRequest) -> bool,
{
    /// Wraps `callback`.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Confirmation for ConfirmFn<F>
where
    F: FnMut(&ArchiveRequest) -> bool,
{
    fn confirm(&mut self, next: &ArchiveRequest) -> Result<bool> {
        Ok((self.callback)(next))
    }
}

impl<C: Confirmation + ?Sized> Confirmation for Box<C> {
    fn confirm(&mut self, next: &ArchiveRequest) -> Result<bool> {
        (**self).confirm(next)
    }
}
