//! # Configuration State
//!
//! Application configuration loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SNIP_*`)
//! 2. Config file (`config.toml` in the platform config directory)
//! 3. Defaults (this file)
//!
//! ```toml
//! # config.toml
//! currency_symbol = "R"
//! orphan_visits = "record"   # or "reject"
//! login_delay_ms = 1000
//! register_delay_ms = 1500
//! # database_path = "/var/lib/snip/snip.db"
//! ```
//!
//! Read-only after load, so no mutex.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use snip_core::{LoyaltyRules, Money, OrphanVisitPolicy, DEFAULT_CURRENCY_SYMBOL};
use snip_store::SessionConfig;
use thiserror::Error;
use tracing::{debug, info, warn};

const MAX_DELAY_MS: u64 = 60_000;
const MAX_SYMBOL_LEN: usize = 4;

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// SQLite file for the session record. Platform data dir when unset.
    pub database_path: Option<PathBuf>,

    /// Currency symbol for display.
    pub currency_symbol: String,

    /// What to do with a visit for an unknown customer.
    pub orphan_visits: OrphanVisitPolicy,

    /// Simulated login latency.
    pub login_delay_ms: u64,

    /// Simulated registration latency.
    pub register_delay_ms: u64,
}

impl Default for ConfigState {
    fn default() -> Self {
        let session = SessionConfig::default();
        ConfigState {
            database_path: None,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            orphan_visits: OrphanVisitPolicy::default(),
            login_delay_ms: session.login_delay.as_millis() as u64,
            register_delay_ms: session.register_delay.as_millis() as u64,
        }
    }
}

impl ConfigState {
    /// Loads defaults, then the config file, then environment overrides.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads config or falls back to defaults with a warning.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let symbol = self.currency_symbol.trim();
        if symbol.is_empty() || symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(ConfigError::Invalid(format!(
                "currency_symbol must be 1-{} characters",
                MAX_SYMBOL_LEN
            )));
        }
        if self.login_delay_ms > MAX_DELAY_MS || self.register_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "delays must not exceed {} ms",
                MAX_DELAY_MS
            )));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SNIP_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Ok(symbol) = std::env::var("SNIP_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Ok(policy) = std::env::var("SNIP_ORPHAN_VISITS") {
            match policy.parse() {
                Ok(parsed) => self.orphan_visits = parsed,
                Err(e) => warn!("Ignoring SNIP_ORPHAN_VISITS: {}", e),
            }
        }

        if let Ok(ms) = std::env::var("SNIP_LOGIN_DELAY_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.login_delay_ms = ms;
            }
        }

        if let Ok(ms) = std::env::var("SNIP_REGISTER_DELAY_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.register_delay_ms = ms;
            }
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "sniprewards", "snip")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The SQLite file to open, creating its directory if needed.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.sniprewards.snip/snip.db`
    /// - **Windows**: `%APPDATA%\sniprewards\snip\data\snip.db`
    /// - **Linux**: `~/.local/share/snip/snip.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.database_path {
            Some(path) => path.clone(),
            None => Self::project_dirs()
                .ok_or_else(|| {
                    ConfigError::Invalid("Could not determine app data directory".into())
                })?
                .data_dir()
                .join("snip.db"),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        Ok(path)
    }

    pub fn loyalty_rules(&self) -> LoyaltyRules {
        LoyaltyRules {
            orphan_visits: self.orphan_visits,
            ..LoyaltyRules::default()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            login_delay: Duration::from_millis(self.login_delay_ms),
            register_delay: Duration::from_millis(self.register_delay_ms),
        }
    }

    /// Formats money with the configured symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with(self.currency_symbol.trim())
    }
}

fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}
