//! Compensating actions for collaborator calls made by a failing command.

use crate::message::error::CollaboratorError;

type Compensation<'a> = Box<dyn FnOnce() -> Result<(), CollaboratorError> + 'a>;

/// Undo steps recorded while a command notifies its collaborators.
///
/// Steps run in reverse order of registration. Every step runs even if an
/// earlier one fails; the first failure is reported.
pub(super) struct Compensations<'a> {
    steps: Vec<Compensation<'a>>,
}

impl<'a> Compensations<'a> {
    pub(super) const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub(super) fn push(
        &mut self,
        step: impl FnOnce() -> Result<(), CollaboratorError> + 'a,
    ) {
        self.steps.push(Box::new(step));
    }

    pub(super) fn unwind(self) -> Result<(), CollaboratorError> {
        let mut first_failure = None;
        for step in self.steps.into_iter().rev() {
            if let Err(err) = step() {
                first_failure.get_or_insert(err);
            }
        }
        first_failure.map_or(Ok(()), Err)
    }
}
