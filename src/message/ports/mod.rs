//! Port trait definitions for the message subsystem.
//!
//! Ports define the abstract interfaces that the aggregate requires from
//! its collaborators. Adapters implement these ports to connect the domain
//! to threads, accounts, event storage, and other infrastructure.

pub mod account;
pub mod context;
pub mod events;
pub mod filter;
pub mod loader;
pub mod repository;
pub mod thread;
pub mod validator;

pub use account::Account;
pub use context::MessageContext;
pub use events::EventSink;
pub use filter::{ContentFilter, FilterPipeline, PassThroughFilter};
pub use loader::LazyLoader;
pub use repository::{MessageHandle, MessageRepository};
pub use thread::{ForumThread, ThreadDirectory};
pub use validator::{ContentValidator, ValidationConfig};
