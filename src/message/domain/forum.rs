//! References to the forum hosting a message and the message's public URL.

use super::ForumId;
use serde::{Deserialize, Serialize};

/// Reference to the forum a message was posted in.
///
/// A forum loaded without its name is only partially hydrated; messages
/// refuse to solidify against it.
///
/// # Examples
///
/// ```
/// use agora::message::domain::{ForumId, ForumRef};
///
/// assert!(ForumRef::new(ForumId::new(3), "Rust").is_complete());
/// assert!(!ForumRef::unnamed(ForumId::new(3)).is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumRef {
    id: ForumId,
    name: Option<String>,
}

impl ForumRef {
    /// Creates a fully hydrated forum reference.
    #[must_use]
    pub fn new(id: ForumId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Creates a forum reference whose name has not been loaded.
    #[must_use]
    pub const fn unnamed(id: ForumId) -> Self {
        Self { id, name: None }
    }

    /// Returns the forum identifier.
    #[must_use]
    pub const fn id(&self) -> ForumId {
        self.id
    }

    /// Returns the forum name, if loaded.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` when the reference carries a non-blank name.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.trim().is_empty())
    }
}

/// Public link to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUrl {
    /// The absolute URL.
    pub url: String,
    /// Text shown for the link.
    pub link_name: String,
}

impl MessageUrl {
    /// Creates a message URL.
    #[must_use]
    pub fn new(url: impl Into<String>, link_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            link_name: link_name.into(),
        }
    }
}
