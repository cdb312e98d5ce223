//! External process execution.

pub mod command;
pub mod mock;

pub use command::{display_command, CommandResult, ProcessRunner, SystemRunner};
pub use mock::ScriptedRunner;
