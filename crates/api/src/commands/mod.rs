//! Presentation commands
//!
//! Every command takes the session context, runs one view model operation,
//! and returns a [`CommandOutcome`](crate::utils::command_helpers::CommandOutcome).

pub mod session;

pub use session::*;
