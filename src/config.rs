use std::env;
use thiserror::Error;
use tower_cookies::Key;

const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.db";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got '{0}'")]
    InvalidPort(String),
    #[error("SECRET_KEY must be at least 64 bytes long")]
    SecretTooShort,
}

/// Process configuration read from the environment (and `.env`).
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Signs the flash-message cookie.
    pub flash_key: Key,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            env::var("DATABASE_URL").ok(),
            env::var("PORT").ok(),
            env::var("SECRET_KEY").ok(),
        )
    }

    fn from_vars(
        database_url: Option<String>,
        port: Option<String>,
        secret: Option<String>,
    ) -> Result<Self, ConfigError> {
        let database_url = database_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or(ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let flash_key = match secret.filter(|s| !s.trim().is_empty()) {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| ConfigError::SecretTooShort)?,
            None => {
                log::warn!("SECRET_KEY not set or blank; flash messages will not survive a restart");
                Key::generate()
            }
        };

        Ok(Self { database_url, port, flash_key })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_vars(None, None, None).unwrap();
        assert_eq!(config.database_url, "sqlite://inventory.db");
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn port_must_be_valid() {
        assert!(matches!(
            AppConfig::from_vars(None, Some("http".into()), None),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            AppConfig::from_vars(None, Some("0".into()), None),
            Err(ConfigError::InvalidPort(_))
        ));
        let config = AppConfig::from_vars(None, Some("8080".into()), None).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            AppConfig::from_vars(None, None, Some("ucbpl".into())),
            Err(ConfigError::SecretTooShort)
        ));
        let long = "k".repeat(64);
        assert!(AppConfig::from_vars(None, None, Some(long)).is_ok());
    }

    #[test]
    fn blank_secret_falls_back_to_generated_key() {
        assert!(AppConfig::from_vars(None, None, Some(String::new())).is_ok());
        assert!(AppConfig::from_vars(None, None, Some("   ".into())).is_ok());
    }
}
