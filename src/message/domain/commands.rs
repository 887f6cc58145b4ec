//! Commands accepted by the message aggregate.

use super::{MessageContent, MessageId, Property, UploadFile};
use crate::message::ports::account::Account;
use std::fmt;
use std::sync::Arc;

/// Request to post a reply beneath an existing message.
///
/// Replaying the same command posts a second reply; callers deduplicate.
#[derive(Clone)]
pub struct PostReplyCommand {
    pub(super) parent_id: MessageId,
    pub(super) reply_id: MessageId,
    pub(super) content: MessageContent,
    pub(super) account: Arc<dyn Account>,
    pub(super) attachments: Vec<UploadFile>,
    pub(super) properties: Vec<Property>,
}

impl PostReplyCommand {
    /// Creates a reply command with the required fields.
    #[must_use]
    pub fn new(
        parent_id: MessageId,
        reply_id: MessageId,
        content: MessageContent,
        account: Arc<dyn Account>,
    ) -> Self {
        Self {
            parent_id,
            reply_id,
            content,
            account,
            attachments: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Sets the files attached to the reply.
    #[must_use]
    pub fn with_attachments(mut self, files: impl IntoIterator<Item = UploadFile>) -> Self {
        self.attachments = files.into_iter().collect();
        self
    }

    /// Sets the properties recorded for the reply.
    #[must_use]
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties = properties.into_iter().collect();
        self
    }

    /// Returns the message being replied to.
    #[must_use]
    pub const fn parent_id(&self) -> MessageId {
        self.parent_id
    }

    /// Returns the identifier assigned to the reply.
    #[must_use]
    pub const fn reply_id(&self) -> MessageId {
        self.reply_id
    }

    /// Returns the submitted content.
    #[must_use]
    pub const fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Returns the replying account.
    #[must_use]
    pub fn account(&self) -> &Arc<dyn Account> {
        &self.account
    }

    /// Returns the attached files.
    #[must_use]
    pub fn attachments(&self) -> &[UploadFile] {
        &self.attachments
    }

    /// Returns the submitted properties.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}

impl fmt::Debug for PostReplyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostReplyCommand")
            .field("parent_id", &self.parent_id)
            .field("reply_id", &self.reply_id)
            .field("content", &self.content)
            .field("account_id", &self.account.id())
            .field("attachments", &self.attachments)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Request to revise an existing message.
///
/// Attachments and properties are only touched when supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviseCommand {
    pub(super) content: MessageContent,
    pub(super) attachments: Option<Vec<UploadFile>>,
    pub(super) properties: Option<Vec<Property>>,
}

impl ReviseCommand {
    /// Creates a revision of the content only.
    #[must_use]
    pub const fn new(content: MessageContent) -> Self {
        Self {
            content,
            attachments: None,
            properties: None,
        }
    }

    /// Replaces the message's attachments.
    #[must_use]
    pub fn with_attachments(mut self, files: impl IntoIterator<Item = UploadFile>) -> Self {
        self.attachments = Some(files.into_iter().collect());
        self
    }

    /// Merges properties into the message's property set.
    #[must_use]
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties = Some(properties.into_iter().collect());
        self
    }

    /// Returns the submitted content.
    #[must_use]
    pub const fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Returns the replacement attachments, if supplied.
    #[must_use]
    pub fn attachments(&self) -> Option<&[UploadFile]> {
        self.attachments.as_deref()
    }

    /// Returns the properties to merge, if supplied.
    #[must_use]
    pub fn properties(&self) -> Option<&[Property]> {
        self.properties.as_deref()
    }
}
