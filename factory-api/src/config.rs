/// Configuration management for the API server
///
/// Loads configuration from environment variables (and `.env` in
/// development) into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma separated allowed origins, `*` for any (default: *)
/// - `REGISTRATION_ALLOW_LIST`: Comma separated emails activated at signup (default: empty)
/// - `FACTORY_FIXTURE`: Fixture applied at startup, `simple` or unset
/// - `RUST_LOG`: Log filter (default: `DEFAULT_LOG_FILTER`, debug for the factory crates and tower_http)
/// - `LOG_FORMAT`: `json` for structured logs, anything else for text
///
/// # Example
///
/// ```no_run
/// use factory_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "factory_api=debug,factory_shared=debug,tower_http=debug";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub registration: RegistrationConfig,

    /// Fixture to apply once at startup
    pub fixture: Option<Fixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Emails granted `active` status on registration
    pub allow_list: Vec<String>,
}

/// Startup fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixture {
    /// Recreates the `primary` owner and its organization
    Simple,
}

impl Fixture {
    pub fn parse(s: &str) -> anyhow::Result<Option<Self>> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(None),
            "simple" => Ok(Some(Fixture::Simple)),
            other => anyhow::bail!("Unknown fixture '{}'", other),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric variable
    /// does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let cors_origins = split_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let allow_list = split_list(&env::var("REGISTRATION_ALLOW_LIST").unwrap_or_default());

        let fixture = Fixture::parse(&env::var("FACTORY_FIXTURE").unwrap_or_default())?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            registration: RegistrationConfig { allow_list },
            fixture,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
