use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_API_BASE, FetchOrdering, NotifyMode, StoredConfig, config_file_path,
    validate_api_base,
};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring tboard.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        "API base URL (e.g., http://localhost:3000/api)",
        &mut cfg.api_base,
    )?;
    apply_prompt("Failure notifications (alert/log)", &mut cfg.notify)?;
    apply_prompt(
        "Fetch ordering (last-response/latest-request)",
        &mut cfg.fetch_ordering,
    )?;
    validate(&cfg)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!(
        "API base URL: {}",
        display_value(&cfg.api_base, DEFAULT_API_BASE)
    );
    println!(
        "Failure notifications: {}",
        display_value(&cfg.notify, NotifyMode::Alert.as_str())
    );
    println!(
        "Fetch ordering: {}",
        display_value(&cfg.fetch_ordering, FetchOrdering::LastResponse.as_str())
    );

    Ok(())
}

fn validate(cfg: &StoredConfig) -> AppResult<()> {
    if let Some(value) = &cfg.api_base {
        validate_api_base(value)?;
    }
    if let Some(value) = &cfg.notify {
        NotifyMode::from_str(value).ok_or_else(|| {
            AppError::Configuration(format!("unknown notify mode '{value}'"))
        })?;
    }
    if let Some(value) = &cfg.fetch_ordering {
        FetchOrdering::from_str(value).ok_or_else(|| {
            AppError::Configuration(format!("unknown fetch ordering '{value}'"))
        })?;
    }
    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>) -> AppResult<()> {
    match prompt(field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match current {
        Some(value) => write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::from_input(&input))
}

fn display_value(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("{default} (default)"))
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}
