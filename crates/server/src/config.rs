//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ASTER_DATABASE_URL` - `PostgreSQL` connection string (unless the
//!   memory store backend is selected)
//! - `AUTH_BASE_URL` - Base URL of the hosted auth platform REST API
//! - `AUTH_SERVICE_KEY` - Service-role key for the auth platform
//! - `ADMIN_USERNAME` - Back-office login name
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the back-office password
//! - `ADMIN_TOKEN_SECRET` - HMAC secret for admin session tokens (min 32 chars)
//!
//! ## Optional
//! - `ASTER_HOST` - Bind address (default: 127.0.0.1)
//! - `ASTER_PORT` - Listen port (default: 3000)
//! - `ASTER_STORE_BACKEND` - `postgres` (default) or `memory`
//! - `EMAIL_API_KEY` - Email provider API key; notifications are disabled
//!   when unset
//! - `EMAIL_API_URL` - Email provider base URL (default: https://api.resend.com)
//! - `EMAIL_FROM` - Sender address (default: onboarding@resend.dev)
//! - `ADMIN_NOTIFY_EMAIL` - Recipient for new-order notifications (required
//!   when `EMAIL_API_KEY` is set)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use argon2::password_hash::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use aster_core::Email;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which backend the key-value store runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// `PostgreSQL` JSONB table (durable, the production default).
    Postgres,
    /// In-memory map, for tests and local experiments.
    Memory,
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Key-value store backend selection
    pub store_backend: StoreBackend,
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Hosted auth platform configuration
    pub auth: AuthPlatformConfig,
    /// Email notification configuration; `None` disables notifications
    pub email: Option<EmailConfig>,
    /// Back-office credential and token configuration
    pub admin: AdminConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Hosted auth platform (GoTrue-compatible) configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct AuthPlatformConfig {
    /// Base URL of the platform's auth REST API
    pub base_url: Url,
    /// Service-role key (full admin access - server-side only)
    pub service_key: SecretString,
}

impl std::fmt::Debug for AuthPlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPlatformConfig")
            .field("base_url", &self.base_url.as_str())
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

/// Email provider configuration for order notifications.
#[derive(Clone)]
pub struct EmailConfig {
    /// Provider base URL
    pub api_url: String,
    /// Provider API key
    pub api_key: SecretString,
    /// Sender address
    pub from: Email,
    /// Admin recipient for new-order notifications
    pub notify_to: Email,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("from", &self.from)
            .field("notify_to", &self.notify_to)
            .finish()
    }
}

/// Back-office credential and session-token configuration.
#[derive(Clone)]
pub struct AdminConfig {
    /// Login name
    pub username: String,
    /// Argon2 PHC hash of the password
    pub password_hash: SecretString,
    /// HMAC secret for signing session tokens
    pub token_secret: SecretString,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("token_secret", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if secrets fail validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present; ignore errors (file is optional)
        let _ = dotenvy::dotenv();

        let host = optional_parsed("ASTER_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = optional_parsed("ASTER_PORT", 3000)?;

        let store_backend = match std::env::var("ASTER_STORE_BACKEND").ok().as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "ASTER_STORE_BACKEND".into(),
                    format!("expected `postgres` or `memory`, got `{other}`"),
                ));
            }
        };

        let database_url = std::env::var("ASTER_DATABASE_URL")
            .ok()
            .map(SecretString::from);
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar("ASTER_DATABASE_URL".into()));
        }

        Ok(Self {
            host,
            port,
            store_backend,
            database_url,
            auth: AuthPlatformConfig::from_env()?,
            email: EmailConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
        })
    }

    /// Socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthPlatformConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = require_env("AUTH_BASE_URL")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("AUTH_BASE_URL".into(), e.to_string()))?;

        Ok(Self {
            base_url,
            service_key: SecretString::from(require_env("AUTH_SERVICE_KEY")?),
        })
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(api_key) = std::env::var("EMAIL_API_KEY") else {
            return Ok(None);
        };

        let api_url = std::env::var("EMAIL_API_URL")
            .unwrap_or_else(|_| "https://api.resend.com".to_string());

        let from = std::env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "onboarding@resend.dev".to_string());
        let from = Email::parse(&from)
            .map_err(|e| ConfigError::InvalidEnvVar("EMAIL_FROM".into(), e.to_string()))?;

        let notify_to = require_env("ADMIN_NOTIFY_EMAIL")?;
        let notify_to = Email::parse(&notify_to)
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_NOTIFY_EMAIL".into(), e.to_string()))?;

        Ok(Some(Self {
            api_url,
            api_key: SecretString::from(api_key),
            from,
            notify_to,
        }))
    }
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let username = require_env("ADMIN_USERNAME")?;

        let password_hash = require_env("ADMIN_PASSWORD_HASH")?;
        PasswordHash::new(&password_hash).map_err(|e| {
            ConfigError::InvalidEnvVar(
                "ADMIN_PASSWORD_HASH".into(),
                format!("not a valid PHC hash string: {e}"),
            )
        })?;

        let token_secret = require_env("ADMIN_TOKEN_SECRET")?;
        if token_secret.len() < MIN_TOKEN_SECRET_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "ADMIN_TOKEN_SECRET".into(),
                format!("must be at least {MIN_TOKEN_SECRET_LENGTH} characters"),
            ));
        }

        Ok(Self {
            username,
            password_hash: SecretString::from(password_hash),
            token_secret: SecretString::from(token_secret),
        })
    }

    /// Expose the token secret for signing/verification.
    #[must_use]
    pub fn token_secret_bytes(&self) -> &[u8] {
        self.token_secret.expose_secret().as_bytes()
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_parsed<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
    use argon2::Argon2;

    use super::*;

    /// Password matching the hash in [`test_config`].
    pub(crate) const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

    /// Build a config suitable for in-process tests: memory store, no
    /// Sentry, admin credentials with a known password, notifications off.
    pub(crate) fn test_config() -> ServerConfig {
        #[allow(clippy::unwrap_used)]
        let password_hash = Argon2::default()
            .hash_password(
                TEST_ADMIN_PASSWORD.as_bytes(),
                &SaltString::generate(&mut OsRng),
            )
            .unwrap()
            .to_string();

        #[allow(clippy::unwrap_used)]
        let base_url = Url::parse("http://127.0.0.1:9/auth/v1").unwrap();

        ServerConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            store_backend: StoreBackend::Memory,
            database_url: None,
            auth: AuthPlatformConfig {
                base_url,
                service_key: SecretString::from("test-service-key"),
            },
            email: None,
            admin: AdminConfig {
                username: "admin".to_string(),
                password_hash: SecretString::from(password_hash),
                token_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
            },
            sentry_dsn: None,
        }
    }

    /// Like [`test_config`], but with the email provider pointing at a
    /// closed loopback port, for notification-failure-isolation tests.
    pub(crate) fn test_config_with_unreachable_email() -> ServerConfig {
        let mut config = test_config();

        #[allow(clippy::unwrap_used)]
        let (from, notify_to) = (
            Email::parse("onboarding@resend.dev").unwrap(),
            Email::parse("owner@asterboutique.dev").unwrap(),
        );

        config.email = Some(EmailConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            api_key: SecretString::from("re_test_key"),
            from,
            notify_to,
        });
        config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config_is_consistent() {
        let config = testing::test_config();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.email.is_none());
        assert!(config.admin.token_secret_bytes().len() >= MIN_TOKEN_SECRET_LENGTH);
    }
}
