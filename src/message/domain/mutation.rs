//! Mutation commands on the forum message aggregate.
//!
//! Each command validates its input first, then stages the new revision,
//! notifies the account and thread, and publishes its events as one batch.
//! When a collaborator fails, the previous revision is restored and every
//! notification already made is compensated in reverse order. If a
//! compensation itself fails, the message is marked inconsistent and refuses
//! further commands.

use super::{
    AttachmentSet, EventEnvelope, ForumMessage, MessageDraft, MessageEvent, PostReplyCommand,
    ReviseCommand,
    message::{Inconsistency, Revision},
    rollback::Compensations,
};
use crate::message::{
    error::{CollaboratorError, ConstructionError, MessageError, ValidationError},
    ports::{
        context::MessageContext,
        thread::{ForumThread, ThreadResult},
    },
};
use mockable::Clock;
use std::sync::Arc;

/// A staged revision awaiting collaborator notification and publication.
struct PendingRevision<'a> {
    previous: Revision,
    staged: Revision,
    events: Vec<MessageEvent>,
    compensations: Compensations<'a>,
}

/// Surfaces content and filter failures of a reply as command failures.
fn reply_error(err: ConstructionError) -> MessageError {
    match err {
        ConstructionError::Content(validation) => MessageError::Validation(validation),
        ConstructionError::Collaborator(collaborator) => MessageError::Collaborator(collaborator),
        other => MessageError::Construction(other),
    }
}

impl ForumMessage {
    /// Posts a reply beneath this message.
    ///
    /// The reply inherits this message's forum, thread, and filter. It is
    /// registered with the thread, the replying account's message count is
    /// incremented, and a [`MessageEvent::ReplyPosted`] event carrying the
    /// raw content is published.
    ///
    /// # Errors
    ///
    /// - [`MessageError::NotReady`] before solidification
    /// - [`MessageError::Validation`] if the command names another parent
    ///   or the reply content is blank
    /// - [`MessageError::Collaborator`] if the filter, thread, account, or
    ///   event sink fails; the reply is unregistered and the count restored
    /// - [`MessageError::Inconsistent`] if that restoration also fails
    pub fn add_reply(
        &mut self,
        command: PostReplyCommand,
        ctx: &MessageContext,
        clock: &impl Clock,
    ) -> Result<Self, MessageError> {
        let parent = self.writable()?;
        let parent_id = parent.id();
        if command.parent_id != parent_id {
            return Err(ValidationError::ParentMismatch {
                expected: parent_id,
                actual: command.parent_id,
            }
            .into());
        }

        let PostReplyCommand {
            reply_id,
            content,
            account,
            attachments,
            properties,
            ..
        } = command;
        let now = clock.utc();
        let thread_id = parent.thread_id();
        let draft = MessageDraft {
            id: reply_id,
            parent: Some(parent_id),
            content: content.clone(),
            forum: parent.forum().clone(),
            thread: thread_id,
            account: Arc::clone(&account),
            created_at: now,
            modified_at: now,
            filter: Some(Arc::clone(&parent.filter)),
            attachments: attachments.clone(),
            properties,
            url: None,
        };
        let reply = Self::from_draft(draft).map_err(reply_error)?;
        let reply_state = reply.state()?;
        let event = MessageEvent::ReplyPosted {
            parent_id,
            reply_id,
            thread_id,
            forum_id: reply_state.forum().id(),
            account_id: account.id(),
            content,
            attachments,
            properties: reply_state.properties().properties(),
            created_at: now,
        };

        let thread = ctx.threads().thread(thread_id)?;
        thread.add_new_message(parent_id, &reply)?;
        let mut compensations = Compensations::new();
        compensations.push(|| thread.remove_message(reply_id));

        if let Err(cause) = account.update_message_count(1) {
            return Err(self.abort(None, None, compensations, cause));
        }
        compensations.push(|| account.update_message_count(-1));

        if let Err(cause) = ctx.events().emit(&EventEnvelope::new(event, clock)) {
            return Err(self.abort(None, None, compensations, cause));
        }
        Ok(reply)
    }

    /// Revises the message content, and optionally its attachments and
    /// properties.
    ///
    /// The new content is filtered before it is stored and the modification
    /// time advances. Events are published in order: attachments (when
    /// supplied), the content revision, then the property set (only when
    /// the merge changed a value).
    ///
    /// # Errors
    ///
    /// - [`MessageError::NotReady`] before solidification
    /// - [`MessageError::Validation`] for blank content, malformed
    ///   properties, or a change to the masked flag or dig counter, before
    ///   anything changes
    /// - [`MessageError::Collaborator`] if the filter, thread, or event
    ///   sink fails; the previous revision is restored
    /// - [`MessageError::Inconsistent`] if the thread cannot be resynced
    pub fn revise(
        &mut self,
        command: ReviseCommand,
        ctx: &MessageContext,
        clock: &impl Clock,
    ) -> Result<(), MessageError> {
        let ReviseCommand {
            content,
            attachments,
            properties,
        } = command;
        let state = self.writable()?;
        let message_id = state.id();
        let thread_id = state.thread_id();
        let effective = state.effective_content(content.clone())?;
        let previous = state.revision.clone();
        let modified_at = clock.utc();
        let mut staged = Revision {
            content: effective,
            modified_at,
            ..previous.clone()
        };

        let mut events = Vec::with_capacity(3);
        if let Some(files) = attachments {
            staged.attachments = AttachmentSet::new(message_id, files.iter().cloned());
            events.push(MessageEvent::UploadFilesAttached { message_id, files });
        }
        events.push(MessageEvent::MessageRevised {
            message_id,
            content,
            modified_at,
        });
        let properties_changed = properties
            .map(|changes| staged.properties.merge_revision(changes))
            .transpose()?
            .unwrap_or(false);
        if properties_changed {
            events.push(MessageEvent::MessagePropertiesRevised {
                message_id,
                properties: staged.properties.properties(),
            });
        }

        let thread = ctx.threads().thread(thread_id)?;
        self.commit(
            PendingRevision {
                previous,
                staged,
                events,
                compensations: Compensations::new(),
            },
            thread.as_ref(),
            |target, message| target.update_message(message),
            ctx,
            clock,
        )
    }

    /// Masks or unmasks the message and its owning account.
    ///
    /// The original content is fetched before anything changes and replaces
    /// the effective content in the same revision, so the thread and
    /// moderators see what was actually posted. A failed command restores
    /// the filtered content along with the flag.
    ///
    /// # Errors
    ///
    /// - [`MessageError::NotReady`] before solidification
    /// - [`MessageError::Collaborator`] if the loader, account, thread, or
    ///   event sink fails; the account flag and property set are restored
    /// - [`MessageError::Validation`] if the loader returns blank content
    /// - [`MessageError::Inconsistent`] if that restoration fails
    pub fn moderate(
        &mut self,
        masked: bool,
        ctx: &MessageContext,
        clock: &impl Clock,
    ) -> Result<(), MessageError> {
        let state = self.writable()?;
        let message_id = state.id();
        let thread_id = state.thread_id();
        let account = Arc::clone(state.account());
        let previous = state.revision.clone();

        let original = ctx.loader().reload(message_id)?;
        original.ensure_not_empty()?;

        let mut staged = previous.clone();
        staged.properties.set_masked(masked);
        staged.content = original;
        let events = vec![MessageEvent::MessagePropertiesRevised {
            message_id,
            properties: staged.properties.properties(),
        }];

        let thread = ctx.threads().thread(thread_id)?;
        let was_masked = account.is_masked();
        account.set_masked(masked)?;
        let mut compensations = Compensations::new();
        compensations.push(|| account.set_masked(was_masked));

        self.commit(
            PendingRevision {
                previous,
                staged,
                events,
                compensations,
            },
            thread.as_ref(),
            |target, message| target.update_message(message),
            ctx,
            clock,
        )
    }

    /// Records a dig (an up-vote) on the message.
    ///
    /// # Errors
    ///
    /// - [`MessageError::NotReady`] before solidification
    /// - [`MessageError::Collaborator`] if the thread or event sink fails;
    ///   the counter is restored
    /// - [`MessageError::Inconsistent`] if the thread cannot be resynced
    pub fn dig(&mut self, ctx: &MessageContext, clock: &impl Clock) -> Result<(), MessageError> {
        let state = self.writable()?;
        let message_id = state.id();
        let thread = ctx.threads().thread(state.thread_id())?;
        let previous = state.revision.clone();
        let mut staged = previous.clone();
        staged.properties.add_dig();
        let events = vec![MessageEvent::MessagePropertiesRevised {
            message_id,
            properties: staged.properties.properties(),
        }];

        self.commit(
            PendingRevision {
                previous,
                staged,
                events,
                compensations: Compensations::new(),
            },
            thread.as_ref(),
            |target, message| target.add_dig(message),
            ctx,
            clock,
        )
    }

    /// Applies a staged revision, notifies the thread, and publishes.
    fn commit(
        &mut self,
        pending: PendingRevision<'_>,
        thread: &dyn ForumThread,
        notify: impl FnOnce(&dyn ForumThread, &Self) -> ThreadResult<()>,
        ctx: &MessageContext,
        clock: &impl Clock,
    ) -> Result<(), MessageError> {
        let PendingRevision {
            previous,
            staged,
            events,
            compensations,
        } = pending;
        self.writable_mut()?.revision = staged;

        if let Err(cause) = notify(thread, &*self) {
            return Err(self.abort(Some(previous), Some(thread), compensations, cause));
        }

        let batch: Vec<EventEnvelope> = events
            .into_iter()
            .map(|event| EventEnvelope::new(event, clock))
            .collect();
        if let Err(cause) = ctx.events().publish(&batch) {
            return Err(self.abort(Some(previous), Some(thread), compensations, cause));
        }
        Ok(())
    }

    /// Rolls back a failed command and reports its outcome.
    ///
    /// Restores `previous` when given, unwinds `compensations`, and resyncs
    /// `thread` with the restored state. Any rollback failure marks the
    /// message inconsistent.
    fn abort(
        &mut self,
        previous: Option<Revision>,
        thread: Option<&dyn ForumThread>,
        compensations: Compensations<'_>,
        cause: CollaboratorError,
    ) -> MessageError {
        let message_id = match self.writable_mut() {
            Ok(state) => {
                if let Some(revision) = previous {
                    state.revision = revision;
                }
                state.id()
            }
            Err(err) => return err,
        };

        let mut rollback = compensations.unwind().err();
        if let Some(Err(err)) = thread.map(|target| target.resync(&*self)) {
            rollback.get_or_insert(err);
        }

        let Some(rollback_failure) = rollback else {
            return MessageError::Collaborator(cause);
        };
        self.inconsistency = Some(Inconsistency {
            cause: Box::new(cause.clone()),
            rollback: Box::new(rollback_failure.clone()),
        });
        MessageError::Inconsistent {
            message_id,
            cause: Box::new(cause),
            rollback: Box::new(rollback_failure),
        }
    }
}
