//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! tests and single-process embedding without external infrastructure.

mod account;
mod events;
mod repository;
mod thread;

pub use account::InMemoryAccount;
pub use events::InMemoryEventStore;
pub use repository::InMemoryMessageRepository;
pub use thread::{InMemoryThread, InMemoryThreadDirectory, ThreadEntry, ThreadOperation};
