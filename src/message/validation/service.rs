//! Validation service implementation.
//!
//! Provides the default implementation of the `ContentValidator` port,
//! combining individual validation rules into one validator.

use crate::message::{
    domain::{MessageContent, UploadFile},
    error::ValidationError,
    ports::validator::{ContentValidator, ValidationConfig, ValidationResult},
    validation::rules,
};

/// Default implementation of the content validator.
///
/// Applies all validation rules in order, collecting errors to provide
/// comprehensive feedback rather than failing on the first error.
///
/// # Examples
///
/// ```
/// use agora::message::domain::MessageContent;
/// use agora::message::ports::validator::ContentValidator;
/// use agora::message::validation::service::DefaultContentValidator;
///
/// let validator = DefaultContentValidator::new();
/// assert!(validator.validate(&MessageContent::new("Hello", "World"), &[]).is_ok());
/// assert!(validator.validate(&MessageContent::new(" ", ""), &[]).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultContentValidator {
    config: ValidationConfig,
}

impl DefaultContentValidator {
    /// Creates a new validator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new validator with custom configuration.
    #[must_use]
    pub const fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the current validation configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl ContentValidator for DefaultContentValidator {
    fn validate(
        &self,
        content: &MessageContent,
        attachments: &[UploadFile],
    ) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.validate_content(content) {
            collect_errors(&mut errors, e);
        }

        if let Err(e) = self.validate_attachments(attachments) {
            errors.push(e);
        }

        ValidationError::combine(errors).map_or(Ok(()), Err)
    }

    fn validate_content(&self, content: &MessageContent) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = rules::validate_not_blank(content) {
            collect_errors(&mut errors, e);
        }

        if let Err(e) = rules::validate_subject_length(content, &self.config) {
            errors.push(e);
        }

        if let Err(e) = rules::validate_body_length(content, &self.config) {
            errors.push(e);
        }

        ValidationError::combine(errors).map_or(Ok(()), Err)
    }

    fn validate_attachments(&self, attachments: &[UploadFile]) -> ValidationResult<()> {
        rules::validate_attachment_count(attachments, &self.config)
    }
}

/// Helper function to collect errors, flattening `Multiple` variants.
fn collect_errors(errors: &mut Vec<ValidationError>, error: ValidationError) {
    match error {
        ValidationError::Multiple(inner) => errors.extend(inner),
        other => errors.push(other),
    }
}
