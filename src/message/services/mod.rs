//! Application services for the message subsystem.
//!
//! Services orchestrate domain operations and coordinate between ports,
//! serialising commands per aggregate.

mod command;

pub use command::{MessageCommandService, MessageServiceError, MessageServiceResult};
