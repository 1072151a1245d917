//! Configuration management for the Authentify backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with AUTHENTIFY__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Which repository backs the store
    pub storage: StorageConfig,

    /// Database configuration, required when `storage.backend` is postgres
    pub database: Option<DatabaseConfig>,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Password hashing configuration
    pub password: PasswordConfig,

    /// Geocoding collaborator configuration
    pub geocoding: GeocodingConfig,

    /// Load the demo businesses, reviews and accounts on startup
    pub seed_demo_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// bcrypt work factor (4-31)
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Disabled geocoding leaves business coordinates empty
    pub enabled: bool,

    /// Nominatim-compatible search endpoint
    pub endpoint: String,

    /// User-Agent sent to the geocoder (Nominatim requires one)
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AUTHENTIFY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.backend", "memory")?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("password.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("geocoding.enabled", false)?
            .set_default("geocoding.endpoint", "https://nominatim.openstreetmap.org/search")?
            .set_default("geocoding.user_agent", "AuthentifyApp/1.0")?
            .set_default("geocoding.timeout_secs", 5)?
            .set_default("seed_demo_data", environment == "development")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AUTHENTIFY__ prefix)
            .add_source(
                Environment::with_prefix("AUTHENTIFY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration used by tests and embedded servers: in-memory storage,
    /// no geocoding, no demo data
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            storage: StorageConfig {
                backend: StorageBackend::Memory,
            },
            database: None,
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expiry: 3600,
            },
            password: PasswordConfig { bcrypt_cost: 4 },
            geocoding: GeocodingConfig {
                enabled: false,
                endpoint: String::new(),
                user_agent: "AuthentifyApp/1.0".to_string(),
                timeout_secs: 1,
            },
            seed_demo_data: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
