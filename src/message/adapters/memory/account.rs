//! In-memory implementation of the `Account` port.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use tracing::debug;

use crate::message::{
    domain::AccountId,
    error::CollaboratorError,
    ports::account::{Account, AccountResult},
};

/// In-memory account with atomic counters.
///
/// Each failure switch makes the matching operation fail until cleared.
#[derive(Debug)]
pub struct InMemoryAccount {
    id: AccountId,
    message_count: AtomicI64,
    masked: AtomicBool,
    fail_count_updates: AtomicBool,
    fail_masking: AtomicBool,
}

impl InMemoryAccount {
    /// Creates an unmasked account with no messages.
    #[must_use]
    pub const fn new(id: AccountId) -> Self {
        Self {
            id,
            message_count: AtomicI64::new(0),
            masked: AtomicBool::new(false),
            fail_count_updates: AtomicBool::new(false),
            fail_masking: AtomicBool::new(false),
        }
    }

    /// Returns the number of messages posted by the account.
    #[must_use]
    pub fn message_count(&self) -> i64 {
        self.message_count.load(Ordering::Acquire)
    }

    /// Makes message count updates fail (`true`) or succeed (`false`).
    pub fn fail_count_updates(&self, fail: bool) {
        self.fail_count_updates.store(fail, Ordering::Release);
    }

    /// Makes moderation flag changes fail (`true`) or succeed (`false`).
    pub fn fail_masking(&self, fail: bool) {
        self.fail_masking.store(fail, Ordering::Release);
    }
}

impl Account for InMemoryAccount {
    fn id(&self) -> AccountId {
        self.id
    }

    fn update_message_count(&self, delta: i64) -> AccountResult<()> {
        if self.fail_count_updates.load(Ordering::Acquire) {
            return Err(CollaboratorError::account(
                self.id,
                "update_message_count",
                "injected failure",
            ));
        }
        let previous = self.message_count.fetch_add(delta, Ordering::AcqRel);
        debug!(account_id = %self.id, previous, delta, "message count updated");
        Ok(())
    }

    fn is_masked(&self) -> bool {
        self.masked.load(Ordering::Acquire)
    }

    fn set_masked(&self, masked: bool) -> AccountResult<()> {
        if self.fail_masking.load(Ordering::Acquire) {
            return Err(CollaboratorError::account(
                self.id,
                "set_masked",
                "injected failure",
            ));
        }
        self.masked.store(masked, Ordering::Release);
        debug!(account_id = %self.id, masked, "account moderation flag set");
        Ok(())
    }
}
