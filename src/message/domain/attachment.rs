//! Upload files attached to a message.

use super::{MessageId, UploadFileId};
use serde::{Deserialize, Serialize};

/// Metadata for a single uploaded file.
///
/// Storage of the file bytes is handled elsewhere; the message only keeps
/// what is needed to list and replay the attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFile {
    /// Identifier assigned by the upload store.
    pub id: UploadFileId,
    /// Original file name.
    pub name: String,
    /// The MIME type of the file.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl UploadFile {
    /// Creates upload file metadata.
    #[must_use]
    pub fn new(
        id: UploadFileId,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// The set of files attached to one message.
///
/// # Examples
///
/// ```
/// use agora::message::domain::{AttachmentSet, MessageId, UploadFile, UploadFileId};
///
/// let set = AttachmentSet::new(
///     MessageId::new(1),
///     vec![UploadFile::new(UploadFileId::new(9), "a.png", "image/png", 512)],
/// );
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSet {
    message_id: MessageId,
    files: Vec<UploadFile>,
}

impl AttachmentSet {
    /// Creates an attachment set for a message.
    #[must_use]
    pub fn new(message_id: MessageId, files: impl IntoIterator<Item = UploadFile>) -> Self {
        Self {
            message_id,
            files: files.into_iter().collect(),
        }
    }

    /// Creates an empty attachment set.
    #[must_use]
    pub const fn empty(message_id: MessageId) -> Self {
        Self {
            message_id,
            files: Vec::new(),
        }
    }

    /// Returns the owning message identifier.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Returns the attached files.
    #[must_use]
    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    /// Returns the number of attached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
