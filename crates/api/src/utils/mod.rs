//! Command plumbing shared by every session command

pub mod command_helpers;
pub mod logging;
