//! In-memory thread aggregate and thread directory.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::message::{
    domain::{ForumMessage, MessageId, ThreadId},
    error::CollaboratorError,
    ports::thread::{ForumThread, ThreadDirectory, ThreadResult},
};

/// Thread operations that can be made to fail in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThreadOperation {
    /// [`ForumThread::add_new_message`].
    AddMessage,
    /// [`ForumThread::remove_message`].
    RemoveMessage,
    /// [`ForumThread::update_message`].
    UpdateMessage,
    /// [`ForumThread::add_dig`].
    AddDig,
}

impl ThreadOperation {
    /// Returns the operation name used in error reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddMessage => "add_new_message",
            Self::RemoveMessage => "remove_message",
            Self::UpdateMessage => "update_message",
            Self::AddDig => "add_dig",
        }
    }
}

impl fmt::Display for ThreadOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The thread's view of one of its messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    /// The message's parent, `None` for the root.
    pub parent: Option<MessageId>,
    /// Subject as last reported by the message.
    pub subject: String,
    /// Dig count as last reported by the message.
    pub dig_count: u32,
    /// Masked flag as last reported by the message.
    pub masked: bool,
}

impl ThreadEntry {
    fn snapshot(message: &ForumMessage) -> Option<(MessageId, Self)> {
        let state = message.state().ok()?;
        Some((
            state.id(),
            Self {
                parent: state.parent_id(),
                subject: state.content().subject().to_owned(),
                dig_count: state.dig_count(),
                masked: state.is_masked(),
            },
        ))
    }
}

#[derive(Debug, Default)]
struct ThreadState {
    root: Option<MessageId>,
    entries: BTreeMap<MessageId, ThreadEntry>,
    updates: usize,
    failing: BTreeSet<ThreadOperation>,
}

/// In-memory thread holding the reply tree of one discussion.
///
/// Thread-safe via internal [`RwLock`].
#[derive(Debug)]
pub struct InMemoryThread {
    id: ThreadId,
    state: RwLock<ThreadState>,
}

impl InMemoryThread {
    /// Creates an empty thread.
    #[must_use]
    pub fn new(id: ThreadId) -> Self {
        Self {
            id,
            state: RwLock::new(ThreadState::default()),
        }
    }

    /// Registers `message` as the thread's root.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Thread`] if the message is not ready,
    /// is a reply, or the thread already has a root.
    pub fn set_root(&self, message: &ForumMessage) -> ThreadResult<()> {
        let (id, entry) = ThreadEntry::snapshot(message)
            .ok_or_else(|| self.error(ThreadOperation::AddMessage, "root is not ready"))?;
        if entry.parent.is_some() {
            return Err(self.error(ThreadOperation::AddMessage, "root cannot be a reply"));
        }
        let mut state = self.write(ThreadOperation::AddMessage)?;
        if state.root.is_some() {
            return Err(self.error(ThreadOperation::AddMessage, "thread already has a root"));
        }
        state.root = Some(id);
        state.entries.insert(id, entry);
        debug!(thread_id = %self.id, message_id = %id, "thread root registered");
        Ok(())
    }

    /// Makes `operation` fail until [`InMemoryThread::recover`] is called.
    pub fn fail_on(&self, operation: ThreadOperation) {
        if let Ok(mut state) = self.state.write() {
            state.failing.insert(operation);
        }
    }

    /// Makes `operation` succeed again.
    pub fn recover(&self, operation: ThreadOperation) {
        if let Ok(mut state) = self.state.write() {
            state.failing.remove(&operation);
        }
    }

    /// Returns the thread's view of a message.
    #[must_use]
    pub fn entry(&self, id: MessageId) -> Option<ThreadEntry> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.entries.get(&id).cloned())
    }

    /// Returns `true` if the message belongs to this thread.
    #[must_use]
    pub fn contains(&self, id: MessageId) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.entries.contains_key(&id))
    }

    /// Returns the direct replies to `parent`, in identifier order.
    #[must_use]
    pub fn replies_to(&self, parent: MessageId) -> Vec<MessageId> {
        self.state
            .read()
            .map(|state| {
                state
                    .entries
                    .iter()
                    .filter(|(_, entry)| entry.parent == Some(parent))
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of messages in the thread.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.state.read().map(|state| state.entries.len()).unwrap_or(0)
    }

    /// Returns how many update and dig notifications the thread received.
    ///
    /// Resyncs after a rolled-back command are not counted.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.state.read().map(|state| state.updates).unwrap_or(0)
    }

    fn error(&self, operation: ThreadOperation, reason: impl Into<String>) -> CollaboratorError {
        CollaboratorError::thread(self.id, operation.as_str(), reason)
    }

    fn write(
        &self,
        operation: ThreadOperation,
    ) -> ThreadResult<std::sync::RwLockWriteGuard<'_, ThreadState>> {
        let state = self
            .state
            .write()
            .map_err(|e| self.error(operation, format!("lock poisoned: {e}")))?;
        if state.failing.contains(&operation) {
            return Err(self.error(operation, "injected failure"));
        }
        Ok(state)
    }

    fn refresh(
        &self,
        operation: ThreadOperation,
        message: &ForumMessage,
        notified: bool,
    ) -> ThreadResult<()> {
        let (id, entry) = ThreadEntry::snapshot(message)
            .ok_or_else(|| self.error(operation, "message is not ready"))?;
        let mut state = self.write(operation)?;
        let Some(current) = state.entries.get_mut(&id) else {
            return Err(self.error(operation, format!("message {id} is not in this thread")));
        };
        *current = entry;
        if notified {
            state.updates = state.updates.saturating_add(1);
        }
        Ok(())
    }
}

impl ForumThread for InMemoryThread {
    fn id(&self) -> ThreadId {
        self.id
    }

    fn is_root(&self, message: MessageId) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.root == Some(message))
    }

    fn is_leaf(&self, message: MessageId) -> bool {
        self.state.read().is_ok_and(|state| {
            !state
                .entries
                .values()
                .any(|entry| entry.parent == Some(message))
        })
    }

    fn add_new_message(&self, parent: MessageId, reply: &ForumMessage) -> ThreadResult<()> {
        let operation = ThreadOperation::AddMessage;
        let (id, entry) = ThreadEntry::snapshot(reply)
            .ok_or_else(|| self.error(operation, "reply is not ready"))?;
        let mut state = self.write(operation)?;
        if !state.entries.contains_key(&parent) {
            return Err(self.error(operation, format!("parent {parent} is not in this thread")));
        }
        if state.entries.contains_key(&id) {
            return Err(self.error(operation, format!("message {id} is already in this thread")));
        }
        state.entries.insert(id, entry);
        debug!(thread_id = %self.id, message_id = %id, parent_id = %parent, "reply registered");
        Ok(())
    }

    fn remove_message(&self, message: MessageId) -> ThreadResult<()> {
        let operation = ThreadOperation::RemoveMessage;
        let mut state = self.write(operation)?;
        if state.entries.remove(&message).is_none() {
            return Err(self.error(operation, format!("message {message} is not in this thread")));
        }
        debug!(thread_id = %self.id, message_id = %message, "message removed");
        Ok(())
    }

    fn update_message(&self, message: &ForumMessage) -> ThreadResult<()> {
        self.refresh(ThreadOperation::UpdateMessage, message, true)
    }

    fn add_dig(&self, message: &ForumMessage) -> ThreadResult<()> {
        self.refresh(ThreadOperation::AddDig, message, true)
    }

    fn resync(&self, message: &ForumMessage) -> ThreadResult<()> {
        self.refresh(ThreadOperation::UpdateMessage, message, false)
    }
}

/// In-memory lookup of live threads.
///
/// Clones share the same directory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryThreadDirectory {
    threads: Arc<RwLock<HashMap<ThreadId, Arc<InMemoryThread>>>>,
}

impl InMemoryThreadDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a thread, replacing any thread with the same identifier.
    pub fn insert(&self, thread: Arc<InMemoryThread>) {
        if let Ok(mut threads) = self.threads.write() {
            threads.insert(thread.id(), thread);
        }
    }

    /// Returns the concrete thread with the given identifier.
    #[must_use]
    pub fn get(&self, id: ThreadId) -> Option<Arc<InMemoryThread>> {
        self.threads
            .read()
            .ok()
            .and_then(|threads| threads.get(&id).cloned())
    }
}

impl ThreadDirectory for InMemoryThreadDirectory {
    fn thread(&self, id: ThreadId) -> ThreadResult<Arc<dyn ForumThread>> {
        self.get(id)
            .map(|thread| thread as Arc<dyn ForumThread>)
            .ok_or(CollaboratorError::ThreadNotFound(id))
    }
}
