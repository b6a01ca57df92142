//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_ID};
use crate::error::AppError;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Persistence engine used for the local override store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// Single redb database file.
    #[default]
    Redb,
    /// One JSON file per key in a directory.
    File,
    /// Process memory only; nothing survives exit.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redb" | "db" => Ok(Self::Redb),
            "file" | "files" | "json" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(AppError::BadRequest(format!(
                "unknown store backend '{}'; expected redb, file or memory",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Redb => "redb",
            Self::File => "file",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Runtime configuration for RecipeBox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub store_path: String,
    pub store_backend: StoreBackend,
    pub timeout_secs: u64,
    pub offline: bool,
    pub user_id: u64,
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    env::current_dir().ok()
}

fn default_store_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("recipebox")
        .join("store")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_nonempty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    let raw = env_nonempty(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        Self {
            api_url: env_nonempty("RECIPEBOX_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            store_path: env_nonempty("RECIPEBOX_STORE_PATH")
                .map(expand_tilde)
                .unwrap_or_else(default_store_path),
            store_backend: env_parsed("RECIPEBOX_STORE_BACKEND").unwrap_or_default(),
            timeout_secs: env_parsed("RECIPEBOX_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS),
            offline: env_flag_enabled("RECIPEBOX_OFFLINE"),
            user_id: env_parsed("RECIPEBOX_USER_ID").unwrap_or(DEFAULT_USER_ID),
        }
    }
}
