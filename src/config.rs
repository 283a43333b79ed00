use clap::Parser;
use once_cell::sync::Lazy;

use crate::errors::{ConfigError, Error};

pub static APP_CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    Config::parse()
});

#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// MongoDB connection string, e.g. `mongodb://localhost:27017/test`.
    /// Left optional here so that a missing value surfaces as a
    /// configuration error from the provider instead of a clap exit.
    #[clap(long, env)]
    pub mongo_uri: Option<String>,

    /// Overrides the default database encoded in the URI path.
    #[clap(long, env)]
    pub database_name: Option<String>,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,
}

impl Config {
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            mongo_uri: Some(uri.into()),
            database_name: None,
            log_level: "info".to_string(),
            port: 8080,
        }
    }

    /// The connection URI, rejecting unset and blank values.
    pub fn mongo_uri(&self) -> Result<&str, Error> {
        match self.mongo_uri.as_deref().map(str::trim) {
            Some(uri) if !uri.is_empty() => Ok(uri),
            _ => Err(ConfigError::MissingUri.into()),
        }
    }
}
