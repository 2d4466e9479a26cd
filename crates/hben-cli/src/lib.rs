//! HBEN CLI library.
//!
//! This library provides the core functionality for the `hben` command-line
//! interface, including network files, configuration management, command
//! execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod network;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use network::{load_network, NetworkFile};
pub use output::Formatter;
