//! P.O.M.S CLI library.
//!
//! Terminal front end for the extraction pipelines: configuration and model
//! profiles, command execution, result formatting and the interactive REPL.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
