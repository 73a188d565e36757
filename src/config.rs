use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{CategoryWeight, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    #[serde(default)]
    pub collection: CollectionSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub identity: IdentitySettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_users_collection")]
    pub users: String,
    #[serde(default = "default_likes_collection")]
    pub likes: String,
    #[serde(default = "default_messages_collection")]
    pub messages: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            users: default_users_collection(),
            likes: default_likes_collection(),
            messages: default_messages_collection(),
        }
    }
}

fn default_users_collection() -> String { "users".to_string() }
fn default_likes_collection() -> String { "likes".to_string() }
fn default_messages_collection() -> String { "messages".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    #[serde(default)]
    pub allowed_email_domains: Vec<String>,
    #[serde(default = "default_true")]
    pub require_verified_email: bool,
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Upper bound on profiles loaded per ranking request
    pub candidate_pool_limit: Option<usize>,
    pub max_limit: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_budget_neutral")]
    pub budget_neutral: f64,
    #[serde(default = "default_neighborhoods_weight")]
    pub neighborhoods: f64,
    #[serde(default = "default_neighborhoods_neutral")]
    pub neighborhoods_neutral: f64,
    #[serde(default = "default_preferences_weight")]
    pub roommate_preferences: f64,
    #[serde(default = "default_preferences_neutral")]
    pub roommate_preferences_neutral: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_weight(),
            budget_neutral: default_budget_neutral(),
            neighborhoods: default_neighborhoods_weight(),
            neighborhoods_neutral: default_neighborhoods_neutral(),
            roommate_preferences: default_preferences_weight(),
            roommate_preferences_neutral: default_preferences_neutral(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            budget: CategoryWeight { weight: config.budget, neutral: config.budget_neutral },
            neighborhoods: CategoryWeight {
                weight: config.neighborhoods,
                neutral: config.neighborhoods_neutral,
            },
            roommate_preferences: CategoryWeight {
                weight: config.roommate_preferences,
                neutral: config.roommate_preferences_neutral,
            },
        }
    }
}

fn default_budget_weight() -> f64 { 40.0 }
fn default_budget_neutral() -> f64 { 20.0 }
fn default_neighborhoods_weight() -> f64 { 35.0 }
fn default_neighborhoods_neutral() -> f64 { 18.0 }
fn default_preferences_weight() -> f64 { 25.0 }
fn default_preferences_neutral() -> f64 { 12.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_long_poll_secs")]
    pub long_poll_secs: u64,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_channel_idle_secs")]
    pub channel_idle_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            long_poll_secs: default_long_poll_secs(),
            channel_capacity: default_channel_capacity(),
            channel_idle_secs: default_channel_idle_secs(),
        }
    }
}

fn default_long_poll_secs() -> u64 { 25 }
fn default_channel_capacity() -> usize { 64 }
fn default_channel_idle_secs() -> u64 { 600 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ROOMIE)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ROOMIE__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("ROOMIE")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("identity.allowed_email_domains")
        .try_parsing(true)
}

/// Let conventional unprefixed variables override secrets
///
/// `DATABASE_URL`, `REDIS_URL`, `APPWRITE_API_KEY` and `JWT_SECRET` take
/// precedence over file values.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("REDIS_URL", "cache.redis_url"),
        ("APPWRITE_API_KEY", "appwrite.api_key"),
        ("JWT_SECRET", "identity.jwt_secret"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
