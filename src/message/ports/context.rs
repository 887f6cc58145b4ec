//! Collaborator bundle handed to message commands.

use super::{events::EventSink, loader::LazyLoader, thread::ThreadDirectory};
use std::fmt;
use std::sync::Arc;

/// The collaborators a message command may call.
///
/// Commands receive the bundle by reference rather than storing it, so the
/// aggregate itself stays free of infrastructure handles.
#[derive(Clone)]
pub struct MessageContext {
    events: Arc<dyn EventSink>,
    loader: Arc<dyn LazyLoader>,
    threads: Arc<dyn ThreadDirectory>,
}

impl MessageContext {
    /// Creates a collaborator bundle.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventSink>,
        loader: Arc<dyn LazyLoader>,
        threads: Arc<dyn ThreadDirectory>,
    ) -> Self {
        Self {
            events,
            loader,
            threads,
        }
    }

    /// Returns the event sink.
    #[must_use]
    pub fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }

    /// Returns the lazy loader.
    #[must_use]
    pub fn loader(&self) -> &dyn LazyLoader {
        self.loader.as_ref()
    }

    /// Returns the thread directory.
    #[must_use]
    pub fn threads(&self) -> &dyn ThreadDirectory {
        self.threads.as_ref()
    }
}

impl fmt::Debug for MessageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageContext").finish_non_exhaustive()
    }
}
