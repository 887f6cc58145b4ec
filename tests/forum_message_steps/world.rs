//! Shared world state for forum message BDD scenarios.

use std::sync::Arc;

use agora::message::{
    adapters::memory::{
        InMemoryAccount, InMemoryEventStore, InMemoryMessageRepository, InMemoryThread,
        InMemoryThreadDirectory,
    },
    domain::{AccountId, MessageContent, MessageId, ThreadId},
    ports::context::MessageContext,
    services::{MessageCommandService, MessageServiceError},
    validation::DefaultContentValidator,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestMessageService =
    MessageCommandService<InMemoryMessageRepository, DefaultContentValidator, DefaultClock>;

/// Identifier of the root message every scenario starts from.
pub const ROOT_ID: MessageId = MessageId::new(1);

/// Scenario world for forum message behaviour tests.
pub struct ForumWorld {
    pub service: TestMessageService,
    pub events: Arc<InMemoryEventStore>,
    pub thread: Arc<InMemoryThread>,
    pub author: Arc<InMemoryAccount>,
    pub next_id: u64,
    pub last_result: Option<Result<(), MessageServiceError>>,
}

impl ForumWorld {
    /// Creates a world with one empty thread and no messages.
    #[must_use]
    pub fn new() -> Self {
        let events = Arc::new(InMemoryEventStore::new());
        let threads = Arc::new(InMemoryThreadDirectory::new());
        let thread = Arc::new(InMemoryThread::new(ThreadId::new(10)));
        threads.insert(Arc::clone(&thread));
        let service = MessageCommandService::new(
            Arc::new(InMemoryMessageRepository::new()),
            Arc::new(DefaultContentValidator::new()),
            MessageContext::new(events.clone(), events.clone(), threads),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            events,
            thread,
            author: Arc::new(InMemoryAccount::new(AccountId::new(7))),
            next_id: 2,
            last_result: None,
        }
    }

    /// Returns the root message's current content.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing or not ready.
    pub fn root_content(&self) -> Result<MessageContent, eyre::Report> {
        run_async(async {
            let handle = self
                .service
                .find(ROOT_ID)
                .await?
                .ok_or_else(|| eyre::eyre!("root message not registered"))?;
            let message = handle.lock().await;
            Ok(message.state()?.content().clone())
        })
    }

    /// Reserves the next free message identifier.
    pub const fn allocate_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for ForumWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ForumWorld {
    ForumWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
