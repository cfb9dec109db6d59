//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};

use crate::domain::config::RecorderConfig;
use crate::domain::recording::{AudioFormat, Duration};
use crate::domain::storage::{Directory, RecordingOptions};

/// voice-recorder - microphone recording with pause/resume and file output
#[derive(Parser, Debug)]
#[command(name = "voice-recorder")]
#[command(version)]
#[command(about = "Record audio from the microphone to FLAC or WAV")]
#[command(long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record until Ctrl+C, the given duration or the configured maximum
    Record(RecordArgs),
    /// Report device capability, permission and status
    Check,
    /// Serve recorder operations as JSON lines over stdin/stdout
    Bridge,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of `record`
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    /// Recording duration (e.g., 10s, 1m, 2m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Base directory (DOCUMENTS, DATA, CACHE, TEMPORARY, ...)
    #[arg(long, value_name = "DIR")]
    pub directory: Option<Directory>,

    /// Folder below the base directory
    #[arg(long, value_name = "DIR")]
    pub sub_directory: Option<String>,

    /// File name or relative path of the output
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<AudioFormat>,

    /// Include the base64 payload even when the file is written
    #[arg(long)]
    pub base64: bool,
}

impl RecordArgs {
    /// Config layer contributed by the command line
    pub fn to_config(&self) -> RecorderConfig {
        RecorderConfig {
            directory: self.directory.map(|d| d.to_string()),
            sub_directory: self.sub_directory.clone(),
            format: self.format.map(|f| f.to_string()),
            max_duration: None,
            include_base64: if self.base64 { Some(true) } else { None },
        }
    }

    /// Options passed to `start_recording`; directory defaults come from config
    pub fn recording_options(&self) -> RecordingOptions {
        RecordingOptions {
            directory: None,
            sub_directory: None,
            path: self.path.clone(),
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed `record` options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    /// Stop after this long; `None` records until Ctrl+C
    pub duration: Option<Duration>,
    /// Hard upper bound regardless of `duration`
    pub max_duration: Duration,
    pub options: RecordingOptions,
}

impl RecordOptions {
    /// Effective automatic stop
    pub fn limit(&self) -> Duration {
        match self.duration {
            Some(d) if d < self.max_duration => d,
            _ => self.max_duration,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "directory",
    "sub_directory",
    "format",
    "max_duration",
    "include_base64",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
