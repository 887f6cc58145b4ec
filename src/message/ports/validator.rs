//! Validator port for incoming message content.
//!
//! Defines the abstract interface for checking submissions against
//! configurable limits before they reach the aggregate.

use crate::message::{
    domain::{MessageContent, UploadFile},
    error::ValidationError,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Port for content validation at the ingestion boundary.
///
/// The aggregate rejects blank content on its own; validators add the
/// configurable limits on top.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Collect all validation errors before returning (not fail-fast)
/// - Use [`ValidationError::combine`] to merge errors
/// - Be stateless and thread-safe
pub trait ContentValidator: Send + Sync {
    /// Validates a submission of content and attachments.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any rule fails. Multiple failures are
    /// combined into `ValidationError::Multiple`.
    fn validate(
        &self,
        content: &MessageContent,
        attachments: &[UploadFile],
    ) -> ValidationResult<()>;

    /// Validates only the content.
    ///
    /// Checks:
    /// - Subject and body are non-blank
    /// - Subject and body are within their length limits
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if content validation fails.
    fn validate_content(&self, content: &MessageContent) -> ValidationResult<()>;

    /// Validates only the attachment list.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TooManyAttachments` if the list is too long.
    fn validate_attachments(&self, attachments: &[UploadFile]) -> ValidationResult<()>;
}

/// Configuration for validation rules.
///
/// # Examples
///
/// ```
/// use agora::message::ports::validator::ValidationConfig;
///
/// let config = ValidationConfig::default();
/// assert_eq!(config.max_subject_chars, 200);
///
/// let strict = ValidationConfig::strict();
/// assert!(strict.max_body_chars < config.max_body_chars);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Maximum subject length in characters.
    pub max_subject_chars: usize,
    /// Maximum body length in characters.
    pub max_body_chars: usize,
    /// Maximum number of attached upload files.
    pub max_attachments: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_subject_chars: 200,
            max_body_chars: 50_000,
            max_attachments: 10,
        }
    }
}

impl ValidationConfig {
    /// Creates a lenient configuration with generous limits.
    ///
    /// Useful for imports of historical content.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            max_subject_chars: 1_000,
            max_body_chars: 1_000_000,
            max_attachments: 100,
        }
    }

    /// Creates a strict configuration with reduced limits.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_subject_chars: 100,
            max_body_chars: 10_000,
            max_attachments: 3,
        }
    }
}
