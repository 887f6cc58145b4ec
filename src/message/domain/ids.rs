//! Domain identifier newtypes for messages, threads, forums, accounts, and
//! events.
//!
//! Forum-side identifiers are numeric and assigned by the surrounding system;
//! event identifiers are random UUIDs minted when an event is emitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates an identifier from its numeric value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying numeric value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id! {
    /// Identifier of a single forum message (root post or reply).
    ///
    /// # Examples
    ///
    /// ```
    /// use agora::message::domain::MessageId;
    ///
    /// let id = MessageId::new(1);
    /// assert_eq!(id.value(), 1);
    /// assert_eq!(id.to_string(), "1");
    /// ```
    MessageId
}

numeric_id! {
    /// Identifier of the thread a message belongs to.
    ThreadId
}

numeric_id! {
    /// Identifier of the forum hosting a thread.
    ForumId
}

numeric_id! {
    /// Identifier of the account that owns a message.
    AccountId
}

numeric_id! {
    /// Identifier of an uploaded file attached to a message.
    UploadFileId
}

/// Unique identifier for an emitted domain event.
///
/// # Examples
///
/// ```
/// use agora::message::domain::EventId;
///
/// let id = EventId::new();
/// assert!(!id.as_ref().is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

/// Note: This implementation generates a new random UUID on each call,
/// which is non-standard behaviour for `Default`. Use `EventId::new()`
/// if the intent to generate a random ID should be explicit.
impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for EventId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
