//! In-memory implementation of the `MessageRepository` port.
//!
//! Provides a simple, thread-safe identity map for tests and single-process
//! use. Not durable.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::message::{
    domain::{ForumMessage, MessageId},
    error::RepositoryError,
    ports::repository::{MessageHandle, MessageRepository, RepositoryResult},
};

#[derive(Debug, Default)]
struct Store {
    messages: HashMap<MessageId, MessageHandle>,
    reserved: HashSet<MessageId>,
}

impl Store {
    fn is_taken(&self, id: MessageId) -> bool {
        self.messages.contains_key(&id) || self.reserved.contains(&id)
    }

    fn store(&mut self, id: MessageId, message: ForumMessage) -> MessageHandle {
        let handle = Arc::new(Mutex::new(message));
        self.messages.insert(id, Arc::clone(&handle));
        debug!(message_id = %id, "message stored");
        handle
    }
}

/// In-memory implementation of [`MessageRepository`].
///
/// Thread-safe via internal [`RwLock`]. Each message gets its own
/// [`tokio::sync::Mutex`] handle.
///
/// # Example
///
/// ```
/// use agora::message::adapters::memory::InMemoryMessageRepository;
///
/// let repo = InMemoryMessageRepository::new();
/// assert!(repo.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages.
    ///
    /// Returns `0` if the internal lock is poisoned. For error-propagating
    /// access, use the repository trait methods instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().map(|guard| guard.messages.len()).unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` is reserved but not yet filled.
    #[must_use]
    pub fn is_reserved(&self, id: MessageId) -> bool {
        self.store
            .read()
            .is_ok_and(|guard| guard.reserved.contains(&id))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Store>> {
        self.store
            .write()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: ForumMessage) -> RepositoryResult<MessageHandle> {
        let id = message.id().ok_or(RepositoryError::NotReady)?;
        let mut guard = self.write()?;

        if guard.is_taken(id) {
            return Err(RepositoryError::DuplicateMessage(id));
        }
        Ok(guard.store(id, message))
    }

    async fn reserve(&self, id: MessageId) -> RepositoryResult<()> {
        let mut guard = self.write()?;

        if guard.is_taken(id) {
            return Err(RepositoryError::DuplicateMessage(id));
        }
        guard.reserved.insert(id);
        debug!(message_id = %id, "message identifier reserved");
        Ok(())
    }

    async fn fill_reservation(&self, message: ForumMessage) -> RepositoryResult<MessageHandle> {
        let id = message.id().ok_or(RepositoryError::NotReady)?;
        let mut guard = self.write()?;

        if !guard.reserved.remove(&id) {
            return Err(RepositoryError::NotReserved(id));
        }
        Ok(guard.store(id, message))
    }

    async fn release(&self, id: MessageId) -> RepositoryResult<()> {
        let mut guard = self.write()?;
        if guard.reserved.remove(&id) {
            debug!(message_id = %id, "message identifier released");
        }
        Ok(())
    }

    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<MessageHandle>> {
        let guard = self
            .store
            .read()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))?;

        Ok(guard.messages.get(&id).cloned())
    }

    async fn exists(&self, id: MessageId) -> RepositoryResult<bool> {
        let guard = self
            .store
            .read()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))?;

        Ok(guard.messages.contains_key(&id))
    }
}
