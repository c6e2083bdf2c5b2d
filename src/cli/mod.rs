//! Command-line front-end.
//!
//! Pure presentation glue: parses the invocation, dispatches intents to the
//! app context, and prints whatever the coordinators ended up owning.

pub mod args;
pub mod commands;

pub use args::{parse_args, CliCommand};
pub use commands::Cli;
