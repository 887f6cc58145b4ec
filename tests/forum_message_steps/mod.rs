//! Step definitions for forum message behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
