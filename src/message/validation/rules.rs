//! Individual validation rule implementations.
//!
//! Each rule is a pure function that validates one aspect of a submission.
//! Rules return `Ok(())` on success or a specific `ValidationError` on
//! failure.

use crate::message::{
    domain::{MessageContent, UploadFile},
    error::ValidationError,
    ports::validator::ValidationConfig,
};

/// Validates that subject and body are non-blank.
///
/// # Errors
///
/// Returns `ValidationError::EmptySubject`, `ValidationError::EmptyBody`, or
/// both combined.
pub fn validate_not_blank(content: &MessageContent) -> Result<(), ValidationError> {
    content.ensure_not_empty()
}

/// Validates that the subject fits the configured limit.
///
/// # Errors
///
/// Returns `ValidationError::SubjectTooLong` if the subject has more
/// characters than allowed.
pub fn validate_subject_length(
    content: &MessageContent,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    let actual = content.subject().chars().count();
    if actual > config.max_subject_chars {
        return Err(ValidationError::SubjectTooLong {
            max: config.max_subject_chars,
            actual,
        });
    }
    Ok(())
}

/// Validates that the body fits the configured limit.
///
/// # Errors
///
/// Returns `ValidationError::BodyTooLong` if the body has more characters
/// than allowed.
pub fn validate_body_length(
    content: &MessageContent,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    let actual = content.body().chars().count();
    if actual > config.max_body_chars {
        return Err(ValidationError::BodyTooLong {
            max: config.max_body_chars,
            actual,
        });
    }
    Ok(())
}

/// Validates the number of attached files.
///
/// # Errors
///
/// Returns `ValidationError::TooManyAttachments` if the list exceeds the
/// configured limit.
pub fn validate_attachment_count(
    attachments: &[UploadFile],
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    let actual = attachments.len();
    if actual > config.max_attachments {
        return Err(ValidationError::TooManyAttachments {
            max: config.max_attachments,
            actual,
        });
    }
    Ok(())
}
