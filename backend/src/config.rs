use std::env;

const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL; the in-memory store is used when absent
    pub database_url: Option<String>,
    /// Maximum database connections in pool
    pub database_max_connections: u32,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// API key for the identity provider; static tokens are used when absent
    pub identity_api_key: Option<String>,
    /// Identity provider base URL
    pub identity_base_url: String,
    /// Identity provider request timeout in seconds (default: 10)
    pub identity_timeout_secs: u64,
    /// `token=subject` pairs for local runs without a provider
    pub static_tokens: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL");

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = var("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let identity_api_key = var("IDENTITY_API_KEY");
        let static_tokens = var("STATIC_TOKENS").unwrap_or_default();

        // Authenticated routes are useless without some way to verify tokens
        if identity_api_key.is_none() && static_tokens.is_empty() {
            return Err(ConfigError::MissingEnvVar("IDENTITY_API_KEY"));
        }

        let identity_base_url =
            var("IDENTITY_BASE_URL").unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_string());

        let identity_timeout_secs = var("IDENTITY_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("IDENTITY_TIMEOUT_SECS"))?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            identity_api_key,
            identity_base_url,
            identity_timeout_secs,
            static_tokens,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 10,
            host: "127.0.0.1".to_string(),
            port: 8080,
            identity_api_key: None,
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            identity_timeout_secs: 10,
            static_tokens: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("IDENTITY_API_KEY", "key-1")]).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.identity_api_key.as_deref(), Some("key-1"));
        assert_eq!(config.identity_base_url, DEFAULT_IDENTITY_BASE_URL);
        assert_eq!(config.identity_timeout_secs, 10);
    }

    #[test]
    fn test_explicit_values() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/petpals"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("STATIC_TOKENS", "tok=alice"),
        ])
        .unwrap();

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/petpals")
        );
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.identity_api_key, None);
        assert_eq!(config.static_tokens, "tok=alice");
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = load(&[("DATABASE_URL", "  "), ("IDENTITY_API_KEY", "key")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_identity_source_required() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::MissingEnvVar("IDENTITY_API_KEY"))
        ));
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            load(&[("IDENTITY_API_KEY", "key"), ("PORT", "eighty")]),
            Err(ConfigError::InvalidValue("PORT"))
        ));
    }
}
