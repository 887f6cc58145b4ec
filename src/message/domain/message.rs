//! The forum message aggregate root.
//!
//! A [`ForumMessage`] is created empty, solidified exactly once from a
//! [`MessageDraft`], and then mutated through the commands in
//! [`super::mutation`]. Content is stored only in its effective (filtered)
//! form until [`ForumMessage::reload_original`] swaps in the raw text.

use super::{
    AccountId, AttachmentSet, ForumRef, LifecycleGuard, LifecyclePhase, MessageContent,
    MessageId, MessageUrl, Property, PropertySet, Solidified, ThreadId, UploadFile,
};
use crate::message::{
    error::{CollaboratorError, ConstructionError, MessageError, ValidationError},
    ports::{
        account::Account,
        filter::ContentFilter,
        loader::LazyLoader,
        thread::ThreadDirectory,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Whether a message opens a thread or replies within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    /// A message without a parent.
    Root,
    /// A reply to another message.
    Reply {
        /// The message replied to.
        parent: MessageId,
    },
}

impl MessageKind {
    /// Derives the kind from an optional parent.
    #[must_use]
    pub const fn from_parent(parent: Option<MessageId>) -> Self {
        match parent {
            Some(parent) => Self::Reply { parent },
            None => Self::Root,
        }
    }

    /// Returns the parent message for replies.
    #[must_use]
    pub const fn parent(self) -> Option<MessageId> {
        match self {
            Self::Root => None,
            Self::Reply { parent } => Some(parent),
        }
    }
}

/// Live reference from a message to its owning thread.
///
/// Stores are released and loads acquired, so a rebinding made on one
/// thread is visible to every later reader.
#[derive(Debug)]
pub struct ThreadBinding(AtomicU64);

impl ThreadBinding {
    /// Creates a binding to `thread`.
    #[must_use]
    pub const fn new(thread: ThreadId) -> Self {
        Self(AtomicU64::new(thread.value()))
    }

    /// Returns the bound thread.
    #[must_use]
    pub fn get(&self) -> ThreadId {
        ThreadId::new(self.0.load(Ordering::Acquire))
    }

    /// Rebinds to another thread.
    pub fn set(&self, thread: ThreadId) {
        self.0.store(thread.value(), Ordering::Release);
    }
}

/// The mutable portion of a message, replaced as a unit by each command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Revision {
    pub(super) content: MessageContent,
    pub(super) modified_at: DateTime<Utc>,
    pub(super) attachments: AttachmentSet,
    pub(super) properties: PropertySet,
}

/// Fully initialised state of a ready message.
pub struct MessageState {
    id: MessageId,
    kind: MessageKind,
    forum: ForumRef,
    thread: ThreadBinding,
    account: Arc<dyn Account>,
    created_at: DateTime<Utc>,
    url: Option<MessageUrl>,
    pub(super) filter: Arc<dyn ContentFilter>,
    pub(super) revision: Revision,
}

impl MessageState {
    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns whether this is a root message or a reply.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the parent message for replies.
    #[must_use]
    pub const fn parent_id(&self) -> Option<MessageId> {
        self.kind.parent()
    }

    /// Returns the current content (effective unless reloaded).
    #[must_use]
    pub const fn content(&self) -> &MessageContent {
        &self.revision.content
    }

    /// Returns the owning forum.
    #[must_use]
    pub const fn forum(&self) -> &ForumRef {
        &self.forum
    }

    /// Returns the currently bound thread.
    #[must_use]
    pub fn thread_id(&self) -> ThreadId {
        self.thread.get()
    }

    /// Returns the owning account.
    #[must_use]
    pub const fn account(&self) -> &Arc<dyn Account> {
        &self.account
    }

    /// Returns the owning account's identifier.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account.id()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn modified_at(&self) -> DateTime<Utc> {
        self.revision.modified_at
    }

    /// Returns the attached files.
    #[must_use]
    pub const fn attachments(&self) -> &AttachmentSet {
        &self.revision.attachments
    }

    /// Returns the property set.
    #[must_use]
    pub const fn properties(&self) -> &PropertySet {
        &self.revision.properties
    }

    /// Returns the public link, if one was assigned.
    #[must_use]
    pub const fn url(&self) -> Option<&MessageUrl> {
        self.url.as_ref()
    }

    /// Returns whether the message is masked by moderation.
    #[must_use]
    pub const fn is_masked(&self) -> bool {
        self.revision.properties.is_masked()
    }

    /// Returns the dig counter.
    #[must_use]
    pub const fn dig_count(&self) -> u32 {
        self.revision.properties.dig_count()
    }

    /// Returns the IP address the message was posted from.
    #[must_use]
    pub fn post_ip(&self) -> Option<&str> {
        self.revision.properties.post_ip()
    }

    /// Returns `true` if `subject` equals the current subject.
    #[must_use]
    pub fn is_subject_repeated(&self, subject: &str) -> bool {
        self.revision.content.subject() == subject
    }

    /// Validates and filters raw content without storing it.
    pub(super) fn effective_content(
        &self,
        raw: MessageContent,
    ) -> Result<MessageContent, MessageError> {
        filter_content(self.filter.as_ref(), raw)
    }
}

impl fmt::Debug for MessageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageState")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("forum", &self.forum)
            .field("thread", &self.thread.get())
            .field("account", &self.account.id())
            .field("created_at", &self.created_at)
            .field("url", &self.url)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Rejects blank content, filters it, and rejects a blank filter result.
fn filter_content<E>(filter: &dyn ContentFilter, raw: MessageContent) -> Result<MessageContent, E>
where
    E: From<ValidationError> + From<CollaboratorError>,
{
    raw.ensure_not_empty()?;
    let filtered = filter.apply(raw)?;
    filtered.ensure_not_empty()?;
    Ok(filtered)
}

/// Parameter object holding every attribute of a message to be solidified.
#[derive(Clone)]
pub struct MessageDraft {
    /// Message identifier.
    pub id: MessageId,
    /// Parent message; `Some` makes the message a reply.
    pub parent: Option<MessageId>,
    /// Raw content as submitted.
    pub content: MessageContent,
    /// Owning forum.
    pub forum: ForumRef,
    /// Owning thread.
    pub thread: ThreadId,
    /// Owning account.
    pub account: Arc<dyn Account>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub modified_at: DateTime<Utc>,
    /// Filter applied to the content; required.
    pub filter: Option<Arc<dyn ContentFilter>>,
    /// Attached upload files.
    pub attachments: Vec<UploadFile>,
    /// Initial properties.
    pub properties: Vec<Property>,
    /// Public link.
    pub url: Option<MessageUrl>,
}

impl MessageDraft {
    /// Returns the kind the solidified message will have.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        MessageKind::from_parent(self.parent)
    }

    fn assemble(self) -> Result<MessageState, ConstructionError> {
        let Self {
            id,
            parent,
            content: raw,
            forum,
            thread,
            account,
            created_at,
            modified_at,
            filter: supplied_filter,
            attachments,
            properties: initial,
            url,
        } = self;

        let filter = supplied_filter.ok_or(ConstructionError::MissingFilter(id))?;
        if !forum.is_complete() {
            return Err(ConstructionError::IncompleteForum {
                message_id: id,
                forum_id: forum.id(),
            });
        }
        let properties = PropertySet::from_properties(id, initial)?;
        let content = filter_content::<ConstructionError>(filter.as_ref(), raw)?;

        Ok(MessageState {
            id,
            kind: MessageKind::from_parent(parent),
            forum,
            thread: ThreadBinding::new(thread),
            account,
            created_at,
            url,
            filter,
            revision: Revision {
                content,
                modified_at,
                attachments: AttachmentSet::new(id, attachments),
                properties,
            },
        })
    }
}

impl fmt::Debug for MessageDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDraft")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("content", &self.content)
            .field("forum", &self.forum)
            .field("thread", &self.thread)
            .field("account", &self.account.id())
            .field("created_at", &self.created_at)
            .field("modified_at", &self.modified_at)
            .field("has_filter", &self.filter.is_some())
            .field("attachments", &self.attachments)
            .field("properties", &self.properties)
            .field("url", &self.url)
            .finish()
    }
}

/// Builder collecting message attributes in their canonical order: parent,
/// content, forum, thread, account, timestamps, filter, attachments,
/// properties.
///
/// # Examples
///
/// ```
/// use agora::message::adapters::memory::InMemoryAccount;
/// use agora::message::domain::{
///     AccountId, ForumId, ForumMessage, ForumRef, MessageContent, MessageId, ThreadId,
/// };
/// use agora::message::ports::filter::PassThroughFilter;
/// use mockable::DefaultClock;
/// use std::sync::Arc;
///
/// let draft = ForumMessage::builder(MessageId::new(1))
///     .content(MessageContent::new("Hello", "World"))
///     .forum(ForumRef::new(ForumId::new(1), "General"))
///     .thread(ThreadId::new(1))
///     .account(Arc::new(InMemoryAccount::new(AccountId::new(7))))
///     .filter(Arc::new(PassThroughFilter))
///     .build(&DefaultClock)
///     .expect("all attributes supplied");
///
/// let message = ForumMessage::from_draft(draft).expect("solidified");
/// assert!(message.is_ready());
/// ```
pub struct MessageBuilder {
    id: MessageId,
    parent: Option<MessageId>,
    content: Option<MessageContent>,
    forum: Option<ForumRef>,
    thread: Option<ThreadId>,
    account: Option<Arc<dyn Account>>,
    created_at: Option<DateTime<Utc>>,
    modified_at: Option<DateTime<Utc>>,
    filter: Option<Arc<dyn ContentFilter>>,
    attachments: Vec<UploadFile>,
    properties: Vec<Property>,
    url: Option<MessageUrl>,
}

impl MessageBuilder {
    /// Starts a builder for the message `id`.
    #[must_use]
    pub const fn new(id: MessageId) -> Self {
        Self {
            id,
            parent: None,
            content: None,
            forum: None,
            thread: None,
            account: None,
            created_at: None,
            modified_at: None,
            filter: None,
            attachments: Vec::new(),
            properties: Vec::new(),
            url: None,
        }
    }

    /// Sets the parent, making the message a reply.
    #[must_use]
    pub const fn parent(mut self, parent: MessageId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the raw content.
    #[must_use]
    pub fn content(mut self, content: MessageContent) -> Self {
        self.content = Some(content);
        self
    }

    /// Sets the owning forum.
    #[must_use]
    pub fn forum(mut self, forum: ForumRef) -> Self {
        self.forum = Some(forum);
        self
    }

    /// Sets the owning thread.
    #[must_use]
    pub const fn thread(mut self, thread: ThreadId) -> Self {
        self.thread = Some(thread);
        self
    }

    /// Sets the owning account.
    #[must_use]
    pub fn account(mut self, account: Arc<dyn Account>) -> Self {
        self.account = Some(account);
        self
    }

    /// Sets the creation timestamp; defaults to the build clock.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the modification timestamp; defaults to the creation timestamp.
    #[must_use]
    pub const fn modified_at(mut self, modified_at: DateTime<Utc>) -> Self {
        self.modified_at = Some(modified_at);
        self
    }

    /// Sets the filter pipeline.
    #[must_use]
    pub fn filter(mut self, filter: Arc<dyn ContentFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the attached files.
    #[must_use]
    pub fn attachments(mut self, files: impl IntoIterator<Item = UploadFile>) -> Self {
        self.attachments = files.into_iter().collect();
        self
    }

    /// Sets the initial properties.
    #[must_use]
    pub fn properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties = properties.into_iter().collect();
        self
    }

    /// Sets the public link.
    #[must_use]
    pub fn url(mut self, url: MessageUrl) -> Self {
        self.url = Some(url);
        self
    }

    /// Produces the draft.
    ///
    /// The filter is carried through unchecked so that a missing filter is
    /// reported by solidification.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::MissingField`] if content, forum,
    /// thread, or account was not supplied.
    pub fn build(self, clock: &impl Clock) -> Result<MessageDraft, ConstructionError> {
        let id = self.id;
        let missing = |field| ConstructionError::MissingField {
            message_id: id,
            field,
        };
        let created_at = self.created_at.unwrap_or_else(|| clock.utc());

        Ok(MessageDraft {
            id,
            parent: self.parent,
            content: self.content.ok_or_else(|| missing("content"))?,
            forum: self.forum.ok_or_else(|| missing("forum"))?,
            thread: self.thread.ok_or_else(|| missing("thread"))?,
            account: self.account.ok_or_else(|| missing("account"))?,
            created_at,
            modified_at: self.modified_at.unwrap_or(created_at),
            filter: self.filter,
            attachments: self.attachments,
            properties: self.properties,
            url: self.url,
        })
    }
}

/// Record of a rollback that could not be completed.
#[derive(Debug, Clone)]
pub(super) struct Inconsistency {
    pub(super) cause: Box<CollaboratorError>,
    pub(super) rollback: Box<CollaboratorError>,
}

/// A single message in a forum thread.
///
/// # Invariants
///
/// - The identifier is assigned once, during solidification
/// - Solidification completes at most once and is never undone
/// - Content is never blank once the message is ready
/// - A reply always has a parent and is never a thread root
///
/// # Concurrency
///
/// [`ForumMessage::solidify`] may race on a shared instance. Commands take
/// `&mut self`, so callers serialise them per message, for example by
/// holding each aggregate behind its own lock.
#[derive(Default)]
pub struct ForumMessage {
    lifecycle: LifecycleGuard<MessageState>,
    pub(super) inconsistency: Option<Inconsistency>,
}

impl ForumMessage {
    /// Creates an empty message awaiting solidification.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lifecycle: LifecycleGuard::new(),
            inconsistency: None,
        }
    }

    /// Starts a builder for the message `id`.
    #[must_use]
    pub const fn builder(id: MessageId) -> MessageBuilder {
        MessageBuilder::new(id)
    }

    /// Creates and solidifies a message in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] under the same conditions as
    /// [`ForumMessage::solidify`].
    pub fn from_draft(draft: MessageDraft) -> Result<Self, ConstructionError> {
        let message = Self::new();
        message.solidify(draft)?;
        Ok(message)
    }

    /// Completes construction from `draft`, once.
    ///
    /// Runs the filter over the draft content exactly once per instance.
    /// When the message is already ready the draft is discarded and the
    /// existing state is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::MissingFilter`] without a filter,
    /// [`ConstructionError::IncompleteForum`] when the forum has no name,
    /// [`ConstructionError::Content`] for blank content or malformed
    /// properties, and [`ConstructionError::Collaborator`] when the filter
    /// fails. The message stays uninitialised in every case.
    pub fn solidify(
        &self,
        draft: MessageDraft,
    ) -> Result<Solidified<'_, MessageState>, ConstructionError> {
        self.lifecycle.solidify(move || draft.assemble())
    }

    /// Returns `true` once solidified.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    /// Returns the construction phase.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.lifecycle.phase()
    }

    /// Returns `true` if a failed rollback left the message inconsistent.
    #[must_use]
    pub const fn is_inconsistent(&self) -> bool {
        self.inconsistency.is_some()
    }

    /// Returns the message identifier once ready.
    #[must_use]
    pub fn id(&self) -> Option<MessageId> {
        self.lifecycle.get().map(MessageState::id)
    }

    /// Returns the ready state.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::NotReady`] before solidification.
    pub fn state(&self) -> Result<&MessageState, MessageError> {
        self.lifecycle
            .get()
            .ok_or_else(|| MessageError::NotReady(self.lifecycle.phase()))
    }

    /// Returns the ready state for a command.
    pub(super) fn writable(&self) -> Result<&MessageState, MessageError> {
        let state = self.state()?;
        if let Some(record) = &self.inconsistency {
            return Err(MessageError::Inconsistent {
                message_id: state.id(),
                cause: record.cause.clone(),
                rollback: record.rollback.clone(),
            });
        }
        Ok(state)
    }

    /// Returns the ready state mutably for a command.
    pub(super) fn writable_mut(&mut self) -> Result<&mut MessageState, MessageError> {
        self.writable()?;
        let phase = self.lifecycle.phase();
        self.lifecycle
            .get_mut()
            .ok_or(MessageError::NotReady(phase))
    }

    /// Returns `true` if this message is the root of its thread.
    ///
    /// Replies answer `false` without consulting the thread.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::NotReady`] before solidification or
    /// [`MessageError::Collaborator`] if the thread cannot be found.
    pub fn is_root(&self, threads: &dyn ThreadDirectory) -> Result<bool, MessageError> {
        let state = self.state()?;
        if state.parent_id().is_some() {
            return Ok(false);
        }
        Ok(threads.thread(state.thread_id())?.is_root(state.id()))
    }

    /// Returns `true` if this message has no replies.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::NotReady`] before solidification or
    /// [`MessageError::Collaborator`] if the thread cannot be found.
    pub fn is_leaf(&self, threads: &dyn ThreadDirectory) -> Result<bool, MessageError> {
        let state = self.state()?;
        Ok(threads.thread(state.thread_id())?.is_leaf(state.id()))
    }

    /// Points the message at another thread.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::NotReady`] before solidification.
    pub fn rebind_thread(&self, thread: ThreadId) -> Result<(), MessageError> {
        self.state()?.thread.set(thread);
        Ok(())
    }

    /// Replaces the content with the filtered form of `content`.
    ///
    /// The raw input is not retained. No event is emitted and the
    /// modification time is untouched; use [`ForumMessage::revise`] for an
    /// observable edit.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Validation`] for blank content (before or
    /// after filtering), [`MessageError::Collaborator`] if the filter fails,
    /// and [`MessageError::NotReady`] before solidification.
    pub fn set_content(&mut self, content: MessageContent) -> Result<(), MessageError> {
        let effective = self.writable()?.effective_content(content)?;
        self.writable_mut()?.revision.content = effective;
        Ok(())
    }

    /// Replaces the content with the original from `loader`, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Collaborator`] if the loader fails,
    /// [`MessageError::Validation`] if it returns blank content, and
    /// [`MessageError::NotReady`] before solidification.
    pub fn reload_original(&mut self, loader: &dyn LazyLoader) -> Result<(), MessageError> {
        let id = self.writable()?.id();
        let original = loader.reload(id)?;
        original.ensure_not_empty()?;
        self.writable_mut()?.revision.content = original;
        Ok(())
    }
}

impl fmt::Debug for ForumMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForumMessage")
            .field("phase", &self.lifecycle.phase())
            .field("state", &self.lifecycle.get())
            .field("inconsistent", &self.is_inconsistent())
            .finish()
    }
}
