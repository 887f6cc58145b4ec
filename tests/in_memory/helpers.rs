//! Shared test helpers for in-memory service integration tests.

use std::sync::Arc;

use agora::message::{
    adapters::memory::{
        InMemoryAccount, InMemoryEventStore, InMemoryMessageRepository, InMemoryThread,
        InMemoryThreadDirectory,
    },
    domain::{AccountId, ForumId, ForumMessage, ForumRef, MessageContent, MessageId, ThreadId},
    ports::{context::MessageContext, filter::PassThroughFilter, thread::ForumThread},
    services::MessageCommandService,
    validation::DefaultContentValidator,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type wired to in-memory adapters.
pub type TestService =
    MessageCommandService<InMemoryMessageRepository, DefaultContentValidator, DefaultClock>;

pub const ROOT_ID: MessageId = MessageId::new(1);
pub const THREAD_ID: ThreadId = ThreadId::new(10);

/// A service and the adapters behind it.
pub struct TestEnv {
    pub service: TestService,
    pub repository: Arc<InMemoryMessageRepository>,
    pub events: Arc<InMemoryEventStore>,
    pub threads: Arc<InMemoryThreadDirectory>,
    pub thread: Arc<InMemoryThread>,
    pub author: Arc<InMemoryAccount>,
}

impl TestEnv {
    /// Creates a service over empty adapters and one empty thread.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryMessageRepository::new());
        let events = Arc::new(InMemoryEventStore::new());
        let threads = Arc::new(InMemoryThreadDirectory::new());
        let thread = Arc::new(InMemoryThread::new(THREAD_ID));
        threads.insert(Arc::clone(&thread));
        let context = MessageContext::new(events.clone(), events.clone(), threads.clone());
        let service = MessageCommandService::new(
            Arc::clone(&repository),
            Arc::new(DefaultContentValidator::new()),
            context,
            Arc::new(DefaultClock),
        );

        Self {
            service,
            repository,
            events,
            threads,
            thread,
            author: Arc::new(InMemoryAccount::new(AccountId::new(7))),
        }
    }

    /// Registers the "Hello"/"World" root message and makes it the thread
    /// root.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the registration fails.
    pub async fn register_root(&self) -> Result<(), eyre::Report> {
        self.register_root_in(ROOT_ID, &self.thread).await
    }

    /// Adds another empty thread to the directory.
    pub fn add_thread(&self, id: ThreadId) -> Arc<InMemoryThread> {
        let thread = Arc::new(InMemoryThread::new(id));
        self.threads.insert(Arc::clone(&thread));
        thread
    }

    /// Registers a "Hello"/"World" message as the root of `thread`.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the registration fails.
    pub async fn register_root_in(
        &self,
        id: MessageId,
        thread: &InMemoryThread,
    ) -> Result<(), eyre::Report> {
        let content = MessageContent::new("Hello", "World");
        let draft = ForumMessage::builder(id)
            .content(content.clone())
            .forum(ForumRef::new(ForumId::new(100), "General"))
            .thread(thread.id())
            .account(self.author.clone())
            .filter(Arc::new(PassThroughFilter))
            .build(&DefaultClock)?;
        let handle = self.service.register(draft).await?;
        thread.set_root(&*handle.lock().await)?;
        self.events.record_original(id, content);
        Ok(())
    }

    /// Returns the current content of a stored message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is unknown or not ready.
    pub async fn content_of(&self, id: MessageId) -> Result<MessageContent, eyre::Report> {
        let handle = self
            .service
            .find(id)
            .await?
            .ok_or_else(|| eyre::eyre!("message {id} not stored"))?;
        let message = handle.lock().await;
        Ok(message.state()?.content().clone())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Provides a fresh service environment for each test.
#[fixture]
pub fn env() -> TestEnv {
    TestEnv::new()
}
