//! Port for the account aggregate that owns messages.

use crate::message::{domain::AccountId, error::CollaboratorError};

/// Result type for account operations.
pub type AccountResult<T> = Result<T, CollaboratorError>;

/// Operations a message needs from its owning account.
///
/// Counter changes are deltas so that a failed command can be compensated
/// with the inverse delta.
pub trait Account: Send + Sync {
    /// Returns the account identifier.
    fn id(&self) -> AccountId;

    /// Adjusts the number of messages posted by this account.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Account`] if the counter cannot be
    /// updated.
    fn update_message_count(&self, delta: i64) -> AccountResult<()>;

    /// Returns whether the account is masked by moderation.
    fn is_masked(&self) -> bool;

    /// Sets the account's moderation flag.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Account`] if the flag cannot be stored.
    fn set_masked(&self, masked: bool) -> AccountResult<()>;
}
