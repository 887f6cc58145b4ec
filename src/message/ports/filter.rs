//! Filter pipeline port.
//!
//! Filters turn raw submitted content into the effective content readers
//! see. The rules themselves live outside this crate; the aggregate only
//! requires that a filter is a pure function over [`MessageContent`].

use crate::message::{domain::MessageContent, error::CollaboratorError};
use std::fmt;
use std::sync::Arc;

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, CollaboratorError>;

/// A content transformation applied before content becomes visible.
///
/// # Implementation Notes
///
/// Implementations must be pure: the same input always yields the same
/// output, and applying a filter has no side effects.
pub trait ContentFilter: Send + Sync {
    /// Transforms content.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Filter`] if the content cannot be
    /// transformed.
    fn apply(&self, content: MessageContent) -> FilterResult<MessageContent>;
}

/// Filter that returns content unchanged.
///
/// # Examples
///
/// ```
/// use agora::message::domain::MessageContent;
/// use agora::message::ports::filter::{ContentFilter, PassThroughFilter};
///
/// let content = MessageContent::new("Hello", "World");
/// let filtered = PassThroughFilter.apply(content.clone()).expect("no-op filter");
/// assert_eq!(filtered, content);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughFilter;

impl ContentFilter for PassThroughFilter {
    fn apply(&self, content: MessageContent) -> FilterResult<MessageContent> {
        Ok(content)
    }
}

/// Ordered chain of filters applied left to right.
///
/// The first failing stage aborts the pipeline.
#[derive(Clone, Default)]
pub struct FilterPipeline {
    stages: Vec<Arc<dyn ContentFilter>>,
}

impl FilterPipeline {
    /// Creates an empty pipeline, equivalent to [`PassThroughFilter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: Arc<dyn ContentFilter>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl ContentFilter for FilterPipeline {
    fn apply(&self, content: MessageContent) -> FilterResult<MessageContent> {
        self.stages
            .iter()
            .try_fold(content, |current, stage| stage.apply(current))
    }
}
