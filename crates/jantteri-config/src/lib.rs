//! Shared configuration for Jantteri client frontends.
//!
//! TOML profiles with environment overrides, resolved into a
//! `jantteri_core::SessionTarget`. A frontend loads a named profile (or the
//! default) and hands the resolved target to `Session::set_target`.

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use jantteri_core::SessionTarget;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named connection profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Server used when a profile omits one.
    #[serde(default = "default_server")]
    pub server: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            server: default_server(),
        }
    }
}

fn default_server() -> String {
    // The controller's development default.
    "ws://localhost:5000".into()
}

/// A named connection profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller URL (e.g. `ws://controller.local:5000`). Falls back to
    /// `defaults.server` when omitted.
    pub server: Option<String>,

    /// Game room to join on connect. Omit to connect without a room.
    pub game_id: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("fi", "jantteri", "jantteri").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("jantteri");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment (`JANTTERI_` prefix).
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("JANTTERI_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Target resolution ───────────────────────────────────────────────

/// Resolve a named profile into a session target.
pub fn resolve_target(config: &Config, profile_name: &str) -> Result<SessionTarget, ConfigError> {
    let profile = config
        .profiles
        .get(profile_name)
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: profile_name.into(),
        })?;
    profile_to_target(profile, &config.defaults)
}

/// Resolve the configured default profile, or an idle target when none
/// is configured.
pub fn resolve_default_target(config: &Config) -> Result<SessionTarget, ConfigError> {
    match &config.default_profile {
        Some(name) if config.profiles.contains_key(name) => resolve_target(config, name),
        _ => Ok(SessionTarget::idle()),
    }
}

/// Build a `SessionTarget` from a profile.
///
/// Validates the server URL and uppercases the game id the way the
/// controller issues them (6-letter uppercase codes).
pub fn profile_to_target(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<SessionTarget, ConfigError> {
    let server = profile
        .server
        .clone()
        .unwrap_or_else(|| defaults.server.clone());

    let server = server.trim().to_owned();
    if let Err(e) = url::Url::parse(&server) {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL '{server}': {e}"),
        });
    }

    let game_id = profile
        .game_id
        .as_ref()
        .map(|id| id.trim().to_uppercase())
        .filter(|id| !id.is_empty());

    let mut target = SessionTarget::new(server);
    if let Some(game_id) = game_id {
        target = target.with_game(game_id);
    }
    Ok(target)
}

// ── Tests ────────────────────────────────────────────────────────────
