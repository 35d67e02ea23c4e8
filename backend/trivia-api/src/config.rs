use config::ConfigError;
use std::{env, str::FromStr, time::Duration};

pub const DEFAULT_TRIVIA_API_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_TRIVIA_BATCH_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Message(format!(
                "unknown storage backend '{}', expected 'mongo' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub storage_backend: StorageBackend,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub trivia_api_url: String,
    pub trivia_batch_size: u32,
    pub trivia_timeout: Option<Duration>,
    pub cors_allowed_origins: Vec<String>,
    /// `username:password` for Basic auth on `/metrics`.
    pub metrics_auth: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            storage_backend: StorageBackend::Mongo,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_database: "trivia".to_string(),
            trivia_api_url: DEFAULT_TRIVIA_API_URL.to_string(),
            trivia_batch_size: DEFAULT_TRIVIA_BATCH_SIZE,
            trivia_timeout: None,
            cors_allowed_origins: Vec::new(),
            metrics_auth: "admin:changeme".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/{env}.toml is optional, APP_ prefixed variables override it
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Self::from_settings(&settings)
    }

    /// Resolves every key from `settings`, then the flat env variable, then the default.
    pub fn from_settings(settings: &config::Config) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_address =
            lookup(settings, "server.address", "BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let storage_backend = match lookup(settings, "storage.backend", "STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.storage_backend,
        };

        let mongo_uri =
            lookup(settings, "database.mongo_uri", "MONGO_URI").unwrap_or(defaults.mongo_uri);

        let mongo_database = lookup(settings, "database.mongo_database", "MONGO_DATABASE")
            .unwrap_or(defaults.mongo_database);

        let trivia_api_url = lookup(settings, "trivia.api_url", "TRIVIA_API_URL")
            .unwrap_or(defaults.trivia_api_url);
        url::Url::parse(&trivia_api_url).map_err(|err| {
            ConfigError::Message(format!("invalid trivia.api_url '{}': {}", trivia_api_url, err))
        })?;

        let trivia_batch_size = match lookup(settings, "trivia.batch_size", "TRIVIA_BATCH_SIZE") {
            Some(value) => parse_number("trivia.batch_size", &value)?,
            None => defaults.trivia_batch_size,
        };

        let trivia_timeout = lookup(settings, "trivia.timeout_secs", "TRIVIA_TIMEOUT_SECS")
            .map(|value| parse_number::<u64>("trivia.timeout_secs", &value))
            .transpose()?
            .map(Duration::from_secs);

        let cors_allowed_origins = lookup(settings, "cors.allowed_origins", "CORS_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let metrics_auth =
            lookup(settings, "metrics.auth", "METRICS_AUTH").unwrap_or(defaults.metrics_auth);

        Ok(Config {
            bind_address,
            storage_backend,
            mongo_uri,
            mongo_database,
            trivia_api_url,
            trivia_batch_size,
            trivia_timeout,
            cors_allowed_origins,
            metrics_auth,
        })
    }
}

fn lookup(settings: &config::Config, key: &str, env_key: &str) -> Option<String> {
    settings
        .get_string(key)
        .ok()
        .or_else(|| env::var(env_key).ok())
        .filter(|value| !value.trim().is_empty())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Message(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn settings(overrides: &[(&str, &str)]) -> config::Config {
        overrides
            .iter()
            .fold(config::Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value).unwrap()
            })
            .build()
            .unwrap()
    }

    #[test]
    #[serial]
    fn defaults_apply_when_nothing_is_set() {
        for key in ["STORAGE_BACKEND", "TRIVIA_API_URL", "TRIVIA_BATCH_SIZE"] {
            env::remove_var(key);
        }

        let config = Config::from_settings(&settings(&[])).unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Mongo);
        assert_eq!(config.trivia_api_url, DEFAULT_TRIVIA_API_URL);
        assert_eq!(config.trivia_batch_size, 10);
        assert!(config.trivia_timeout.is_none());
    }

    #[test]
    #[serial]
    fn settings_override_defaults() {
        let config = Config::from_settings(&settings(&[
            ("storage.backend", "memory"),
            ("trivia.batch_size", "3"),
            ("trivia.timeout_secs", "2"),
            ("cors.allowed_origins", "http://localhost:5500, http://127.0.0.1:5500"),
        ]))
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.trivia_batch_size, 3);
        assert_eq!(config.trivia_timeout, Some(Duration::from_secs(2)));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5500", "http://127.0.0.1:5500"]
        );
    }

    #[test]
    #[serial]
    fn flat_env_variables_are_a_fallback() {
        env::set_var("TRIVIA_BATCH_SIZE", "25");
        let config = Config::from_settings(&settings(&[]));
        env::remove_var("TRIVIA_BATCH_SIZE");

        assert_eq!(config.unwrap().trivia_batch_size, 25);
    }

    #[test]
    #[serial]
    fn unknown_backend_is_rejected() {
        let err = Config::from_settings(&settings(&[("storage.backend", "postgres")])).unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }

    #[test]
    #[serial]
    fn malformed_values_are_rejected() {
        assert!(Config::from_settings(&settings(&[("trivia.api_url", "not a url")])).is_err());
        assert!(Config::from_settings(&settings(&[("trivia.batch_size", "ten")])).is_err());
    }
}
