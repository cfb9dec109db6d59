//! Runners for the record, check and bridge commands

use std::env;
use std::process::ExitCode;
use std::time::{Duration as StdDuration, Instant};

use serde_json::json;
use tokio::io::BufReader;
use tracing::warn;

use crate::application::ports::ConfigStore;
use crate::application::{RecorderSettings, VoiceRecorder, VoiceRecorderPlugin};
use crate::domain::config::RecorderConfig;
use crate::domain::recording::Duration;
use crate::domain::storage::Directory;
use crate::infrastructure::{CpalCapture, FsRecordingStore, StandardEncoder, XdgConfigStore};

use super::args::RecordOptions;
use super::bridge;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the configured directory
pub const DIRECTORY_ENV: &str = "VOICE_RECORDER_DIRECTORY";

const PROGRESS_TICK: StdDuration = StdDuration::from_millis(100);

/// Recorder wired to the desktop adapters
pub type DesktopRecorder = VoiceRecorder<CpalCapture, FsRecordingStore, StandardEncoder>;

/// Build the desktop recorder from merged configuration
pub fn desktop_recorder(config: &RecorderConfig) -> DesktopRecorder {
    VoiceRecorder::new(
        CpalCapture::new(),
        FsRecordingStore::new(),
        StandardEncoder::new(),
        RecorderSettings::from(config),
    )
}

/// Record once, stopping on Ctrl+C or when the limit elapses
pub async fn run_record(options: RecordOptions, config: RecorderConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let recorder = desktop_recorder(&config);
    let limit = options.limit();

    if let Err(e) = recorder.start_recording(Some(options.options)).await {
        presenter.failure(&e);
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner("Recording...");
    let started = Instant::now();
    let mut ticker = tokio::time::interval(PROGRESS_TICK);

    loop {
        ticker.tick().await;
        presenter.update_recording_progress(recorder.elapsed_ms(), limit.as_millis());

        if shutdown.is_shutdown() || started.elapsed() >= limit.as_std() {
            break;
        }
    }

    presenter.update_spinner("Finalizing...");

    let data = match recorder.stop_recording().await {
        Ok(data) => data,
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            presenter.failure(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.spinner_success(&format!(
        "Recorded {}",
        Duration::from_millis(data.ms_duration)
    ));
    if let Some(uri) = &data.uri {
        presenter.info(&format!("Saved to {}", uri));
    }

    match serde_json::to_string_pretty(&data) {
        Ok(json) => {
            presenter.output(&json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Failed to serialize recording: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Report capability, permission and status
pub async fn run_check(config: RecorderConfig) -> ExitCode {
    let presenter = Presenter::new();
    let recorder = desktop_recorder(&config);

    let capable = match recorder.can_device_voice_record().await {
        Ok(response) => response.value,
        Err(e) => {
            presenter.failure(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let permitted = match recorder.has_audio_recording_permission().await {
        Ok(response) => response.value,
        Err(e) => {
            presenter.failure(&e);
            false
        }
    };
    let status = recorder.status().await;

    presenter.check_line("Input device available", capable);
    presenter.check_line("Microphone access", permitted);
    presenter.output(
        &json!({
            "canDeviceVoiceRecord": capable,
            "hasAudioRecordingPermission": permitted,
            "status": status,
        })
        .to_string(),
    );

    if capable && permitted {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Serve JSON-lines requests on stdin/stdout until stdin closes
pub async fn run_bridge(config: RecorderConfig) -> ExitCode {
    let presenter = Presenter::new();
    let recorder = desktop_recorder(&config);

    let input = BufReader::new(tokio::io::stdin());
    match bridge::serve(&recorder, input, tokio::io::stdout()).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&format!("Bridge I/O error: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Configuration contributed by the environment
pub fn env_config() -> RecorderConfig {
    RecorderConfig {
        directory: env_directory(env::var(DIRECTORY_ENV).ok()),
        ..Default::default()
    }
}

/// Keep a directory from the environment only if it names a known directory
fn env_directory(value: Option<String>) -> Option<String> {
    let value = value.filter(|s| !s.is_empty())?;
    match value.parse::<Directory>() {
        Ok(_) => Some(value),
        Err(e) => {
            warn!(var = DIRECTORY_ENV, error = %e, "ignoring invalid directory from environment");
            None
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: RecorderConfig) -> RecorderConfig {
    let file_config = store.load().await.unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        RecorderConfig::empty()
    });

    // defaults < file < env < cli
    RecorderConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

/// [`load_merged_config`] against the XDG config file
pub async fn load_config(cli_config: RecorderConfig) -> RecorderConfig {
    load_merged_config(&XdgConfigStore::new(), cli_config).await
}
