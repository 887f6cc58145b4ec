//! Unit tests for the message module.
//!
//! Tests are organised by domain concept, covering happy paths, error cases,
//! and collaborator failures for all public APIs.

mod support;
