use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub notify: NotifyMode,
    pub fetch_ordering: FetchOrdering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyMode {
    Alert,
    Log,
}

impl NotifyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyMode::Alert => "alert",
            NotifyMode::Log => "log",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "alert" => Some(NotifyMode::Alert),
            "log" | "silent" => Some(NotifyMode::Log),
            _ => None,
        }
    }
}

/// What to do when list responses for one environment settle out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrdering {
    LastResponse,
    LatestRequest,
}

impl FetchOrdering {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOrdering::LastResponse => "last-response",
            FetchOrdering::LatestRequest => "latest-request",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "last-response" => Some(FetchOrdering::LastResponse),
            "latest-request" => Some(FetchOrdering::LatestRequest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub notify: Option<NotifyMode>,
}

impl AppConfig {
    pub fn load(overrides: ConfigOverrides) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(&stored, |key| env::var(key).ok(), overrides)
    }

    fn resolve(
        stored: &StoredConfig,
        lookup: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> AppResult<Self> {
        let layered = |key: &str, stored: &Option<String>| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| stored.clone())
        };

        let api_base = overrides
            .api_base
            .or_else(|| layered("TICKET_BOARD_API_BASE", &stored.api_base))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        validate_api_base(&api_base)?;

        let notify = match overrides.notify {
            Some(mode) => mode,
            None => match layered("TICKET_BOARD_NOTIFY", &stored.notify) {
                Some(value) => NotifyMode::from_str(&value).ok_or_else(|| {
                    AppError::Configuration(format!(
                        "unknown notify mode '{value}' (expected alert or log)"
                    ))
                })?,
                None => NotifyMode::Alert,
            },
        };

        let fetch_ordering = match layered("TICKET_BOARD_FETCH_ORDERING", &stored.fetch_ordering)
        {
            Some(value) => FetchOrdering::from_str(&value).ok_or_else(|| {
                AppError::Configuration(format!(
                    "unknown fetch ordering '{value}' (expected last-response or latest-request)"
                ))
            })?,
            None => FetchOrdering::LastResponse,
        };

        Ok(Self {
            api_base,
            notify,
            fetch_ordering,
        })
    }
}

pub fn validate_api_base(api_base: &str) -> AppResult<()> {
    if api_base.starts_with("http://") || api_base.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Configuration(format!(
            "API base must be an http(s) URL, got '{api_base}'"
        )))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_ordering: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os("TICKET_BOARD_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(dir).join("ticket-board"));
    }
    env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join("ticket-board"))
        .ok_or_else(|| {
            AppError::Configuration("cannot locate config directory: HOME is not set".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
