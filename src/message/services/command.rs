//! Command service for forum messages.
//!
//! The `MessageCommandService` validates incoming submissions, looks up the
//! target aggregate, and runs the command while holding that aggregate's
//! lock, so at most one command is in flight per message.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::message::{
    domain::{ForumMessage, MessageDraft, MessageId, PostReplyCommand, ReviseCommand},
    error::{ConstructionError, MessageError, RepositoryError, ValidationError},
    ports::{
        context::MessageContext,
        repository::{MessageHandle, MessageRepository},
        validator::ContentValidator,
    },
};

/// Service-level errors for message commands.
#[derive(Debug, Error)]
pub enum MessageServiceError {
    /// The submission failed boundary validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A new message could not be solidified.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    /// The aggregate rejected or failed the command.
    #[error(transparent)]
    Message(#[from] MessageError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type for message service operations.
pub type MessageServiceResult<T> = Result<T, MessageServiceError>;

/// Orchestrates commands against live forum messages.
///
/// # Example
///
/// ```ignore
/// let service = MessageCommandService::new(repository, validator, context, clock);
///
/// let root = service.register(draft).await?;
/// let reply = service
///     .post_reply(PostReplyCommand::new(root_id, reply_id, content, account))
///     .await?;
/// service.dig(reply_id).await?;
/// ```
#[derive(Clone)]
pub struct MessageCommandService<R, V, K>
where
    R: MessageRepository,
    V: ContentValidator,
    K: Clock + Send + Sync,
{
    repository: Arc<R>,
    validator: Arc<V>,
    context: MessageContext,
    clock: Arc<K>,
}

impl<R, V, K> MessageCommandService<R, V, K>
where
    R: MessageRepository,
    V: ContentValidator,
    K: Clock + Send + Sync,
{
    /// Creates a new message command service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        validator: Arc<V>,
        context: MessageContext,
        clock: Arc<K>,
    ) -> Self {
        Self {
            repository,
            validator,
            context,
            clock,
        }
    }

    /// Returns the collaborators handed to each command.
    #[must_use]
    pub const fn context(&self) -> &MessageContext {
        &self.context
    }

    /// Validates, solidifies, and stores a new message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Validation`] if the content or
    /// attachments break the configured limits,
    /// [`MessageServiceError::Construction`] if the draft cannot be
    /// solidified, and [`MessageServiceError::Repository`] if the identifier
    /// is taken.
    pub async fn register(&self, draft: MessageDraft) -> MessageServiceResult<MessageHandle> {
        self.validator
            .validate(&draft.content, &draft.attachments)?;
        let id = draft.id;
        let message = ForumMessage::from_draft(draft)?;
        let handle = self.repository.insert(message).await?;
        info!(message_id = %id, "message registered");
        Ok(handle)
    }

    /// Posts a reply and stores it.
    ///
    /// The reply identifier is reserved before the parent runs the command,
    /// so a competing reply with the same identifier is refused before it
    /// touches the thread, the account, or the event sink. The reservation
    /// is released if the parent rejects the reply.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Validation`] for content beyond the
    /// configured limits, [`MessageServiceError::Repository`] if the parent
    /// is unknown or the reply identifier is stored or reserved, and
    /// [`MessageServiceError::Message`] if the parent rejects the reply.
    pub async fn post_reply(
        &self,
        command: PostReplyCommand,
    ) -> MessageServiceResult<MessageHandle> {
        self.validator
            .validate(command.content(), command.attachments())?;
        let parent_id = command.parent_id();
        let reply_id = command.reply_id();
        self.repository.reserve(reply_id).await?;

        let reply = match self.reply_under(parent_id, command).await {
            Ok(reply) => reply,
            Err(err) => {
                if let Err(release) = self.repository.release(reply_id).await {
                    warn!(message_id = %reply_id, error = %release, "reservation not released");
                }
                return Err(err);
            }
        };
        let handle = self.repository.fill_reservation(reply).await?;
        info!(message_id = %reply_id, parent_id = %parent_id, "reply posted");
        Ok(handle)
    }

    /// Revises a stored message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Validation`] for content beyond the
    /// configured limits, [`MessageServiceError::Repository`] if the message
    /// is unknown, and [`MessageServiceError::Message`] if the revision
    /// fails.
    pub async fn revise(&self, id: MessageId, command: ReviseCommand) -> MessageServiceResult<()> {
        self.validator.validate(
            command.content(),
            command.attachments().unwrap_or_default(),
        )?;
        let handle = self.handle(id).await?;
        let mut message = handle.lock().await;
        let outcome = message.revise(command, &self.context, self.clock.as_ref());
        report(id, "revise", outcome)
    }

    /// Masks or unmasks a stored message and its account.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Repository`] if the message is
    /// unknown and [`MessageServiceError::Message`] if moderation fails.
    pub async fn moderate(&self, id: MessageId, masked: bool) -> MessageServiceResult<()> {
        let handle = self.handle(id).await?;
        let mut message = handle.lock().await;
        let outcome = message.moderate(masked, &self.context, self.clock.as_ref());
        report(id, "moderate", outcome)
    }

    /// Records a dig on a stored message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Repository`] if the message is
    /// unknown and [`MessageServiceError::Message`] if the dig fails.
    pub async fn dig(&self, id: MessageId) -> MessageServiceResult<()> {
        let handle = self.handle(id).await?;
        let mut message = handle.lock().await;
        let outcome = message.dig(&self.context, self.clock.as_ref());
        report(id, "dig", outcome)
    }

    /// Swaps a stored message's content for its unfiltered original.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Repository`] if the message is
    /// unknown and [`MessageServiceError::Message`] if the reload fails.
    pub async fn reload_original(&self, id: MessageId) -> MessageServiceResult<()> {
        let handle = self.handle(id).await?;
        let mut message = handle.lock().await;
        let outcome = message.reload_original(self.context.loader());
        report(id, "reload_original", outcome)
    }

    /// Looks up a stored message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Repository`] if the lookup fails.
    pub async fn find(&self, id: MessageId) -> MessageServiceResult<Option<MessageHandle>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    async fn reply_under(
        &self,
        parent_id: MessageId,
        command: PostReplyCommand,
    ) -> MessageServiceResult<ForumMessage> {
        let parent = self.handle(parent_id).await?;
        let mut message = parent.lock().await;
        let outcome = message.add_reply(command, &self.context, self.clock.as_ref());
        report(parent_id, "post_reply", outcome)
    }

    async fn handle(&self, id: MessageId) -> MessageServiceResult<MessageHandle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id).into())
    }
}

/// Logs a command outcome and lifts it into the service error type.
fn report<T>(
    id: MessageId,
    command: &'static str,
    outcome: Result<T, MessageError>,
) -> MessageServiceResult<T> {
    match outcome {
        Ok(value) => {
            info!(message_id = %id, command, "command applied");
            Ok(value)
        }
        Err(err @ MessageError::Inconsistent { .. }) => {
            error!(message_id = %id, command, error = %err, "rollback failed, message quarantined");
            Err(err.into())
        }
        Err(err) => {
            warn!(message_id = %id, command, error = %err, "command rejected");
            Err(err.into())
        }
    }
}
