//! Agora: threaded discussion forum core.
//!
//! This crate provides the forum message aggregate: exactly-once
//! construction, filtered content, and mutation commands that publish
//! replayable domain events while keeping threads and accounts in step.
//!
//! # Architecture
//!
//! Agora follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`message`]: Forum message aggregate, commands, and events

pub mod message;
