//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::RecorderConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::{AudioFormat, Duration};
use crate::domain::storage::Directory;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!(
        "{} = {}",
        key,
        lookup(&config, key).unwrap_or_else(|| value.to_string())
    ));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(&lookup(&config, key).unwrap_or_else(|| NOT_SET.to_string()));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, &lookup(&config, key).unwrap_or_else(|| NOT_SET.to_string()));
    }

    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn invalid(key: &str, message: impl ToString) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Validate `value` for `key` and store its canonical form
fn apply_value(config: &mut RecorderConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "directory" => {
            let directory: Directory = value.parse().map_err(|e| invalid(key, e))?;
            config.directory = Some(directory.to_string());
        }
        "sub_directory" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Value must not be empty"));
            }
            config.sub_directory = Some(value.to_string());
        }
        "format" => {
            let format: AudioFormat = value.parse().map_err(|e| invalid(key, e))?;
            config.format = Some(format.to_string());
        }
        "max_duration" => {
            value.parse::<Duration>().map_err(|e| invalid(key, e))?;
            config.max_duration = Some(value.to_string());
        }
        "include_base64" => {
            let flag = parse_bool(value)
                .ok_or_else(|| invalid(key, "Value must be 'true' or 'false'"))?;
            config.include_base64 = Some(flag);
        }
        _ => return check_key(key),
    }
    Ok(())
}

fn lookup(config: &RecorderConfig, key: &str) -> Option<String> {
    match key {
        "directory" => config.directory.clone(),
        "sub_directory" => config.sub_directory.clone(),
        "format" => config.format.clone(),
        "max_duration" => config.max_duration.clone(),
        "include_base64" => config.include_base64.map(|b| b.to_string()),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
