//! Shared fixtures, collaborators, and test doubles for message tests.

use crate::message::{
    adapters::memory::{InMemoryAccount, InMemoryEventStore, InMemoryThread, InMemoryThreadDirectory},
    domain::{
        AccountId, ForumId, ForumMessage, ForumRef, MessageBuilder, MessageContent, MessageId,
        ThreadId,
    },
    error::CollaboratorError,
    ports::{
        account::{Account, AccountResult},
        context::MessageContext,
        filter::{ContentFilter, FilterResult, PassThroughFilter},
    },
};
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

pub const ROOT_ID: MessageId = MessageId::new(1);
pub const THREAD_ID: ThreadId = ThreadId::new(10);
pub const FORUM_ID: ForumId = ForumId::new(100);
pub const AUTHOR_ID: AccountId = AccountId::new(7);

/// A fixed timestamp well before any clock reading taken in a test.
pub fn long_ago() -> DateTime<Utc> {
    "2024-01-01T00:00:00Z"
        .parse()
        .expect("valid RFC 3339 timestamp")
}

/// Collaborators wired to one thread whose root is message 1.
pub struct Harness {
    pub events: Arc<InMemoryEventStore>,
    pub threads: Arc<InMemoryThreadDirectory>,
    pub thread: Arc<InMemoryThread>,
    pub author: Arc<InMemoryAccount>,
    pub ctx: MessageContext,
    pub clock: DefaultClock,
}

impl Harness {
    pub fn new() -> Self {
        let events = Arc::new(InMemoryEventStore::new());
        let threads = Arc::new(InMemoryThreadDirectory::new());
        let thread = Arc::new(InMemoryThread::new(THREAD_ID));
        threads.insert(Arc::clone(&thread));
        let ctx = MessageContext::new(events.clone(), events.clone(), threads.clone());
        Self {
            events,
            threads,
            thread,
            author: Arc::new(InMemoryAccount::new(AUTHOR_ID)),
            ctx,
            clock: DefaultClock,
        }
    }

    /// Starts a builder for the root message with every field supplied.
    pub fn root_builder(&self, filter: Arc<dyn ContentFilter>) -> MessageBuilder {
        ForumMessage::builder(ROOT_ID)
            .content(MessageContent::new("Hello", "World"))
            .forum(ForumRef::new(FORUM_ID, "General"))
            .thread(THREAD_ID)
            .account(self.author.clone())
            .created_at(long_ago())
            .filter(filter)
    }

    /// Builds the root message, registers it as thread root, and seeds its
    /// original content.
    pub fn root_with(&self, filter: Arc<dyn ContentFilter>) -> ForumMessage {
        let draft = self
            .root_builder(filter)
            .build(&self.clock)
            .expect("all attributes supplied");
        let original = draft.content.clone();
        let message = ForumMessage::from_draft(draft).expect("root should solidify");
        self.thread.set_root(&message).expect("thread has no root yet");
        self.events.record_original(ROOT_ID, original);
        message
    }

    pub fn root(&self) -> ForumMessage {
        self.root_with(Arc::new(PassThroughFilter))
    }
}

#[fixture]
pub fn harness() -> Harness {
    Harness::new()
}

/// Replaces the body with a fixed censorship marker.
#[derive(Debug)]
pub struct CensorFilter;

impl ContentFilter for CensorFilter {
    fn apply(&self, content: MessageContent) -> FilterResult<MessageContent> {
        Ok(content.with_body("[censored]"))
    }
}

/// Upper-cases the subject.
#[derive(Debug)]
pub struct ShoutFilter;

impl ContentFilter for ShoutFilter {
    fn apply(&self, content: MessageContent) -> FilterResult<MessageContent> {
        let subject = content.subject().to_uppercase();
        Ok(content.with_subject(subject))
    }
}

/// Strips the body entirely.
#[derive(Debug)]
pub struct BlankingFilter;

impl ContentFilter for BlankingFilter {
    fn apply(&self, content: MessageContent) -> FilterResult<MessageContent> {
        Ok(content.with_body(""))
    }
}

/// Always fails.
#[derive(Debug)]
pub struct BrokenFilter;

impl ContentFilter for BrokenFilter {
    fn apply(&self, _content: MessageContent) -> FilterResult<MessageContent> {
        Err(CollaboratorError::filter(std::io::Error::other("filter offline")))
    }
}

/// Account that accepts increments but cannot undo them.
#[derive(Debug)]
pub struct OneWayAccount {
    pub count: AtomicI64,
}

impl OneWayAccount {
    pub const fn new() -> Self {
        Self {
            count: AtomicI64::new(0),
        }
    }
}

impl Account for OneWayAccount {
    fn id(&self) -> AccountId {
        AccountId::new(99)
    }

    fn update_message_count(&self, delta: i64) -> AccountResult<()> {
        if delta < 0 {
            return Err(CollaboratorError::account(
                self.id(),
                "update_message_count",
                "decrements are not supported",
            ));
        }
        self.count.fetch_add(delta, Ordering::SeqCst);
        Ok(())
    }

    fn is_masked(&self) -> bool {
        false
    }

    fn set_masked(&self, _masked: bool) -> AccountResult<()> {
        Ok(())
    }
}
