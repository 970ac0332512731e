use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub migrate_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./bills.db".into(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_seconds: 30,
            migrate_on_start: true,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
        }
    }
}

impl AppConfig {
    /// Layered load: compiled defaults, then an optional `config.toml`,
    /// then `APP_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&AppConfig::default())?;

        let mut builder = Config::builder().add_source(defaults);
        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        let merged = builder
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = merged.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn ensure(ok: bool, message: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Message(message.to_string()))
            }
        }

        ensure(self.server.port != 0, "server.port must not be 0")?;
        ensure(!self.database.url.is_empty(), "database.url must not be empty")?;
        ensure(
            self.database.max_connections > 0,
            "database.max_connections must be at least 1",
        )?;
        ensure(
            self.database.min_connections <= self.database.max_connections,
            "database.min_connections must not exceed max_connections",
        )?;
        ensure(
            self.uploads.max_file_size_mb > 0,
            "uploads.max_file_size_mb must be at least 1",
        )?;

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        (self.uploads.max_file_size_mb as usize) * 1024 * 1024
    }
}
