//! voice-recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voice_recorder::cli::{
    app::{load_config, run_bridge, run_check, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, RecordOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_recorder::domain::config::RecorderConfig;
use voice_recorder::domain::recording::Duration;
use voice_recorder::infrastructure::XdgConfigStore;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "voice_recorder=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Check => run_check(load_config(RecorderConfig::empty()).await).await,
        Commands::Bridge => run_bridge(load_config(RecorderConfig::empty()).await).await,
        Commands::Record(args) => {
            let config = load_config(args.to_config()).await;

            let duration = match args.duration.as_deref().map(str::parse::<Duration>) {
                Some(Ok(d)) => Some(d),
                Some(Err(e)) => {
                    presenter.error(&format!("Invalid duration: {}", e));
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
                None => None,
            };

            let max_duration = match config.max_duration_or_default() {
                Ok(d) => d,
                Err(e) => {
                    presenter.error(&format!("Invalid max_duration: {}", e));
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
            };

            let options = RecordOptions {
                duration,
                max_duration,
                options: args.recording_options(),
            };

            run_record(options, config).await
        }
    }
}
