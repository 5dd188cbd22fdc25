//! Terminal front end for the results workspace.

pub mod commands;
pub mod render;

pub use commands::{Cli, Command, DoubtCommand, Workspace};
