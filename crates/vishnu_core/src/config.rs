//! Bot configuration.
//!
//! Sources are layered, later ones overriding earlier ones:
//! 1. Bundled defaults (include_str! from vishnu.toml)
//! 2. `./vishnu.toml` in the working directory, if present
//! 3. An explicit file passed on the command line
//! 4. `VISHNU__*` environment variables (`VISHNU__STORE__POOL_SIZE=4`)
//!
//! The configuration is built once at startup and shared behind an `Arc`.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};
use vishnu_error::{ConfigError, VishnuError, VishnuResult};

const DEFAULT_CONFIG: &str = include_str!("../vishnu.toml");

fn default_prefix() -> String {
    "!".to_string()
}

fn default_max_dice() -> u32 {
    crate::dice::DEFAULT_MAX_DICE
}

fn default_page_rows() -> usize {
    5
}

fn default_pool_size() -> u32 {
    10
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_retry_attempts() -> usize {
    3
}

fn default_retry_backoff_ms() -> u64 {
    100
}

/// Record store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct StoreSettings {
    /// PostgreSQL URL; `DATABASE_URL` is used when unset
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    database_url: Option<String>,

    /// Maximum pooled connections
    #[serde(default = "default_pool_size")]
    #[builder(default = "default_pool_size()")]
    pool_size: u32,

    /// Deadline for each store call in milliseconds
    #[serde(default = "default_timeout_ms")]
    #[builder(default = "default_timeout_ms()")]
    timeout_ms: u64,

    /// Attempts made when the store is unreachable
    #[serde(default = "default_retry_attempts")]
    #[builder(default = "default_retry_attempts()")]
    retry_attempts: usize,

    /// Delay before the first retry; later retries double it
    #[serde(default = "default_retry_backoff_ms")]
    #[builder(default = "default_retry_backoff_ms()")]
    retry_backoff_ms: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_size: default_pool_size(),
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl StoreSettings {
    /// Configured URL, falling back to the `DATABASE_URL` environment variable.
    pub fn resolve_database_url(&self) -> VishnuResult<String> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }

        std::env::var("DATABASE_URL").map_err(|_| {
            ConfigError::new("store.database_url is not set and DATABASE_URL is not in the environment")
                .into()
        })
    }
}

/// Settings read once at startup.
///
/// # Example
///
/// ```toml
/// command_prefix = "!"
/// role_whitelist = ["Dungeon Master"]
/// quest_tiers = ["1", "2", "3"]
/// chan_whitelist = [123456789012345678]
///
/// [store]
/// pool_size = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct BotConfig {
    /// Prefix that marks a message as a command
    #[serde(default = "default_prefix")]
    #[builder(default = "default_prefix()")]
    command_prefix: String,

    /// Channels accepting commands; every channel when unset
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    chan_whitelist: Option<Vec<u64>>,

    /// Roles allowed to run privileged commands
    #[serde(default)]
    #[builder(default)]
    role_whitelist: Vec<String>,

    /// Valid quest tiers
    #[serde(default)]
    #[builder(default)]
    quest_tiers: Vec<String>,

    /// Category that group channels are created under
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    group_category: Option<u64>,

    /// Channel that new groups are announced in
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    announce_chan: Option<u64>,

    /// Maximum dice in one expression
    #[serde(default = "default_max_dice")]
    #[builder(default = "default_max_dice()")]
    max_dice: u32,

    /// Rows per listing table message
    #[serde(default = "default_page_rows")]
    #[builder(default = "default_page_rows()")]
    table_page_rows: usize,

    /// Record store settings
    #[serde(default)]
    #[builder(default)]
    store: StoreSettings,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            chan_whitelist: None,
            role_whitelist: Vec::new(),
            quest_tiers: Vec::new(),
            group_category: None,
            announce_chan: None,
            max_dice: default_max_dice(),
            table_page_rows: default_page_rows(),
            store: StoreSettings::default(),
        }
    }
}

impl BotConfig {
    /// Load bundled defaults, `./vishnu.toml`, an optional explicit file and
    /// the environment, in that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing, any source fails
    /// to parse, or the merged values are invalid.
    #[instrument]
    pub fn load(path: Option<&Path>) -> VishnuResult<Self> {
        debug!("Loading configuration: env > explicit file > ./vishnu.toml > bundled defaults");

        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::new("vishnu.toml", FileFormat::Toml).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("VISHNU")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("chan_whitelist")
                .with_list_parse_key("role_whitelist")
                .with_list_parse_key("quest_tiers"),
        );

        let config: Self = builder
            .build()
            .map_err(|e| {
                VishnuError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VishnuError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        info!(
            prefix = %config.command_prefix,
            tiers = config.quest_tiers.len(),
            roles = config.role_whitelist.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load a single file, filling unset keys with defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> VishnuResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                VishnuError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VishnuError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the bot cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_prefix.trim().is_empty() {
            return Err(ConfigError::new("command_prefix must not be empty"));
        }
        if self.quest_tiers.is_empty() {
            return Err(ConfigError::new("quest_tiers must list at least one tier"));
        }
        if self.table_page_rows == 0 {
            return Err(ConfigError::new("table_page_rows must be at least 1"));
        }
        if self.store.pool_size == 0 {
            return Err(ConfigError::new("store.pool_size must be at least 1"));
        }
        if self.store.retry_attempts == 0 {
            return Err(ConfigError::new("store.retry_attempts must be at least 1"));
        }
        Ok(())
    }
}
