use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::query_compiler::DEFAULT_MAX_HIERARCHY_DEPTH;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Connection settings for the single TypeDB database this process serves.
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct TypeDbConfig {
    /// `host:port` of the TypeDB server
    #[validate(length(min = 1, message = "TypeDB address cannot be empty"))]
    pub address: String,

    #[validate(length(min = 1, message = "TypeDB username cannot be empty"))]
    pub username: String,

    #[serde(skip_serializing, default)]
    pub password: String,

    pub tls_enabled: bool,

    #[validate(length(min = 1, message = "TypeDB database cannot be empty"))]
    pub database: String,
}

impl Default for TypeDbConfig {
    fn default() -> Self {
        Self {
            address: "localhost:1729".to_string(),
            username: "admin".to_string(),
            password: "password".to_string(),
            tls_enabled: false,
            database: "social-network".to_string(),
        }
    }
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    #[validate(nested)]
    pub typedb: TypeDbConfig,

    /// Upper bound on place containment levels walked for one page
    #[validate(range(
        min = 1,
        max = 256,
        message = "Max hierarchy depth must be between 1 and 256"
    ))]
    pub max_hierarchy_depth: usize,

    /// Per-request timeout, covering statement execution
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Request timeout must be between 1 and 3600 seconds"
    ))]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "127.0.0.1".to_string(),
            http_port: 8000,
            typedb: TypeDbConfig::default(),
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            http_host: env::var("SOCIALGRAPH_HOST").unwrap_or(defaults.http_host),
            http_port: parse_env_var("SOCIALGRAPH_PORT", "8000")?,
            typedb: TypeDbConfig {
                address: env::var("TYPEDB_ADDRESS").unwrap_or(defaults.typedb.address),
                username: env::var("TYPEDB_USERNAME").unwrap_or(defaults.typedb.username),
                password: env::var("TYPEDB_PASSWORD").unwrap_or(defaults.typedb.password),
                tls_enabled: parse_env_var("TYPEDB_TLS_ENABLED", "false")?,
                database: env::var("TYPEDB_DATABASE").unwrap_or(defaults.typedb.database),
            },
            max_hierarchy_depth: parse_env_var(
                "SOCIALGRAPH_MAX_HIERARCHY_DEPTH",
                &DEFAULT_MAX_HIERARCHY_DEPTH.to_string(),
            )?,
            request_timeout_secs: parse_env_var("SOCIALGRAPH_REQUEST_TIMEOUT_SECS", "30")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            http_host: cli.http_host,
            http_port: cli.http_port,
            typedb: TypeDbConfig {
                address: cli.typedb_address,
                username: cli.typedb_username,
                password: cli.typedb_password,
                tls_enabled: cli.typedb_tls_enabled,
                database: cli.typedb_database,
            },
            max_hierarchy_depth: cli.max_hierarchy_depth,
            request_timeout_secs: cli.request_timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub http_host: String,
    pub http_port: u16,
    pub typedb_address: String,
    pub typedb_username: String,
    pub typedb_password: String,
    pub typedb_tls_enabled: bool,
    pub typedb_database: String,
    pub max_hierarchy_depth: usize,
    pub request_timeout_secs: u64,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
