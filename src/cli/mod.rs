//! CLI layer - Command-line interface
//!
//! Argument parsing, output formatting, signal handling, the JSON-lines
//! bridge and the command runners.

pub mod app;
pub mod args;
pub mod bridge;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

pub use app::{run_bridge, run_check, run_record, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RecordArgs, RecordOptions};
pub use presenter::Presenter;
