//! The forum message aggregate and its collaborators.
//!
//! A forum message is constructed exactly once, keeps only filtered
//! content visible, and changes state through commands that each publish
//! the events needed to replay them.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::ForumMessage`], [`domain::MessageContent`], [`domain::MessageEvent`], etc.)
//! - **Ports**: Abstract collaborator traits ([`ports::thread::ForumThread`], [`ports::events::EventSink`], [`ports::loader::LazyLoader`])
//! - **Adapters**: Concrete implementations ([`adapters::memory::InMemoryEventStore`], [`adapters::memory::InMemoryThread`])
//! - **Validation**: Configurable limits enforced at ingestion boundaries
//! - **Services**: Per-aggregate command serialisation ([`services::MessageCommandService`])
//!
//! # Example
//!
//! ```
//! use agora::message::adapters::memory::{
//!     InMemoryAccount, InMemoryEventStore, InMemoryThread, InMemoryThreadDirectory,
//! };
//! use agora::message::domain::{
//!     AccountId, ForumId, ForumMessage, ForumRef, MessageContent, MessageId, PostReplyCommand,
//!     ThreadId,
//! };
//! use agora::message::ports::{MessageContext, PassThroughFilter};
//! use mockable::DefaultClock;
//! use std::sync::Arc;
//!
//! let clock = DefaultClock;
//! let events = Arc::new(InMemoryEventStore::new());
//! let threads = Arc::new(InMemoryThreadDirectory::new());
//! let ctx = MessageContext::new(events.clone(), events.clone(), threads.clone());
//! let account = Arc::new(InMemoryAccount::new(AccountId::new(7)));
//!
//! let draft = ForumMessage::builder(MessageId::new(1))
//!     .content(MessageContent::new("Hello", "World"))
//!     .forum(ForumRef::new(ForumId::new(1), "General"))
//!     .thread(ThreadId::new(1))
//!     .account(account.clone())
//!     .filter(Arc::new(PassThroughFilter))
//!     .build(&clock)
//!     .expect("all attributes supplied");
//! let mut root = ForumMessage::from_draft(draft).expect("valid message");
//!
//! let thread = Arc::new(InMemoryThread::new(ThreadId::new(1)));
//! thread.set_root(&root).expect("empty thread");
//! threads.insert(thread);
//!
//! let command = PostReplyCommand::new(
//!     MessageId::new(1),
//!     MessageId::new(2),
//!     MessageContent::new("Re: Hello", "Hi"),
//!     account.clone(),
//! );
//! let reply = root.add_reply(command, &ctx, &clock).expect("reply posted");
//! assert_eq!(reply.is_root(ctx.threads()).ok(), Some(false));
//! assert_eq!(account.message_count(), 1);
//! assert_eq!(events.len(), 1);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
