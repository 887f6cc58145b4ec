//! The subject/body value carried by every forum message.
//!
//! A message holds exactly one representation of its content at a time:
//! either the effective (filtered) form produced by the filter pipeline, or
//! the raw form reloaded from the lazy loader on demand.

use crate::message::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Immutable subject and body pair.
///
/// Construction does not validate; the aggregate checks emptiness before
/// content becomes visible so that raw submissions can be carried in
/// commands and events exactly as they were received.
///
/// # Examples
///
/// ```
/// use agora::message::domain::MessageContent;
///
/// let content = MessageContent::new("Hello", "World");
/// assert_eq!(content.subject(), "Hello");
/// assert!(content.ensure_not_empty().is_ok());
/// assert!(MessageContent::new("", "World").ensure_not_empty().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageContent {
    subject: String,
    body: String,
}

impl MessageContent {
    /// Creates a content value from a subject and a body.
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns a copy with the subject replaced.
    #[must_use]
    pub fn with_subject(&self, subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: self.body.clone(),
        }
    }

    /// Returns a copy with the body replaced.
    #[must_use]
    pub fn with_body(&self, body: impl Into<String>) -> Self {
        Self {
            subject: self.subject.clone(),
            body: body.into(),
        }
    }

    /// Splits the value into its subject and body.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.subject, self.body)
    }

    /// Checks that neither the subject nor the body is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySubject`] or
    /// [`ValidationError::EmptyBody`], or both combined into
    /// [`ValidationError::Multiple`].
    pub fn ensure_not_empty(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.subject.trim().is_empty() {
            errors.push(ValidationError::EmptySubject);
        }
        if self.body.trim().is_empty() {
            errors.push(ValidationError::EmptyBody);
        }
        ValidationError::combine(errors).map_or(Ok(()), Err)
    }
}
