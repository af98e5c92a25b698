//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//! - `STOREFRONT_REDIS_URL` - Redis connection string (cart + bookmarks)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `PAYMENT_CHECKOUT_URL` - Payment provider checkout endpoint
//! - `PAYMENT_PUBLIC_KEY` - Payment provider public key
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 8000)
//! - `CART_TTL_SECS` - Cart/session lifetime in seconds (default: 3600,
//!   matching the session cookie issued by the surrounding web layer)
//! - `PAYMENT_CURRENCY` - ISO currency code sent to the provider (default: UAH)
//! - `PAYMENT_RESULT_URL` - Where the provider sends the shopper after
//!   paying (default: `{STOREFRONT_BASE_URL}/orders/success`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Redis connection URL (may contain password)
    pub redis_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// How long an untouched cart survives
    pub cart_ttl: Duration,
    /// Payment provider configuration
    pub payment: PaymentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Payment provider configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Provider checkout endpoint the link request is POSTed to
    pub checkout_url: String,
    /// Provider public key identifying this store
    pub public_key: String,
    /// ISO currency code for order amounts
    pub currency: String,
    /// Where the provider sends the shopper after paying
    pub result_url: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_url_with_fallback("STOREFRONT_DATABASE_URL", "DATABASE_URL")?;
        let redis_url = get_url_with_fallback("STOREFRONT_REDIS_URL", "REDIS_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let cart_ttl_secs = get_env_or_default("CART_TTL_SECS", "3600")
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_TTL_SECS".to_string(), e.to_string()))?;

        let payment = PaymentConfig::from_env(&base_url)?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            redis_url,
            host,
            port,
            base_url,
            cart_ttl: Duration::from_secs(cart_ttl_secs),
            payment,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PaymentConfig {
    fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            checkout_url: get_required_env("PAYMENT_CHECKOUT_URL")?,
            public_key: get_required_env("PAYMENT_PUBLIC_KEY")?,
            currency: get_env_or_default("PAYMENT_CURRENCY", "UAH"),
            result_url: get_optional_env("PAYMENT_RESULT_URL")
                .unwrap_or_else(|| format!("{}/orders/success", base_url.trim_end_matches('/'))),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a connection URL, trying the service-specific variable first and a
/// generic one second (the generic names are what managed platforms set).
fn get_url_with_fallback(primary_key: &str, fallback_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var(fallback_key) {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            redis_url: SecretString::from("redis://localhost:6379"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_string(),
            cart_ttl: Duration::from_secs(3600),
            payment: PaymentConfig {
                checkout_url: "https://pay.example.com/api/3/checkout".to_string(),
                public_key: "sandbox_i0000000000".to_string(),
                currency: "UAH".to_string(),
                result_url: "http://localhost:8000/orders/success".to_string(),
            },
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("STOREFRONT_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: STOREFRONT_BASE_URL"
        );

        let err = ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), "bad".to_string());
        assert!(err.to_string().contains("STOREFRONT_PORT"));
    }
}
