//! Configuration management for Bookshelf server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON document per storage key
    pub data_dir: PathBuf,
    pub books_key: String,
    pub users_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LibraryConfig {
    /// Maximum number of books a user may hold at once
    pub max_borrowed_books: usize,
    /// Default number of entries per rendered page
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// When set, logs are also written to a daily rolling file in this directory
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (BOOKSHELF_LIBRARY__PAGE_SIZE=5)
            .add_source(
                Environment::with_prefix("BOOKSHELF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "storage.data_dir",
                env::var("BOOKSHELF_DATA_DIR").ok(),
            )?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the services cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.page_size == 0 {
            return Err(ConfigError::Message("library.page_size must be at least 1".into()));
        }
        if self.library.max_borrowed_books == 0 {
            return Err(ConfigError::Message(
                "library.max_borrowed_books must be at least 1".into(),
            ));
        }
        if self.storage.books_key == self.storage.users_key {
            return Err(ConfigError::Message(
                "storage.books_key and storage.users_key must differ".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            books_key: "libraryBooks".to_string(),
            users_key: "library-users".to_string(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            max_borrowed_books: 3,
            page_size: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_catalogue_rules() {
        let config = AppConfig::default();
        assert_eq!(config.library.max_borrowed_books, 3);
        assert_eq!(config.library.page_size, 3);
        assert_eq!(config.storage.books_key, "libraryBooks");
        assert_eq!(config.storage.users_key, "library-users");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = AppConfig::default();
        config.library.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                "[logging]\nlevel = \"debug\"\n[library]\npage_size = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.library.page_size, 5);
        assert_eq!(config.library.max_borrowed_books, 3);
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shared_storage_key_rejected() {
        let mut config = AppConfig::default();
        config.storage.users_key = config.storage.books_key.clone();
        assert!(config.validate().is_err());
    }
}
