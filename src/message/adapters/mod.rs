//! Collaborator adapters for the message module.
//!
//! This module provides concrete implementations of the ports in
//! [`crate::message::ports`], following hexagonal architecture principles.
//! Adapters handle all infrastructure concerns while the domain remains
//! pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryEventStore`]: event sink and lazy loader backed by an
//!   in-process event log
//! - [`memory::InMemoryThread`] and [`memory::InMemoryThreadDirectory`]:
//!   thread aggregates with reply trees
//! - [`memory::InMemoryAccount`]: account counters and moderation flag
//! - [`memory::InMemoryMessageRepository`]: identity map of live aggregates

pub mod memory;
