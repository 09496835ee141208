//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VERTEBRA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `VERTEBRA_SESSION_SECRET` - Session cookie signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `VERTEBRA_HOST` - Bind address (default: 0.0.0.0)
//! - `VERTEBRA_PORT` - Listen port (default: 3000)
//! - `VERTEBRA_BASE_URL` - Public URL (default: `http://localhost:{port}`)
//! - `VERTEBRA_SEED_USERNAME` - Username of the first-run admin account (default: admin)
//! - `VERTEBRA_SEED_PASSWORD` - Password of the first-run admin account (default: admin)
//! - `VERTEBRA_STATIC_DIR` - Directory of static assets (default: crates/server/public)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const SESSION_SECRET_VAR: &str = "VERTEBRA_SESSION_SECRET";
const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_SEED_USERNAME: &str = "admin";
const DEFAULT_SEED_PASSWORD: &str = "admin";

/// Fragments that mark a copied-in sample value (matched case-insensitively).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "changeme",
    "change-me",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "vertebra",
    "xxx",
    "your-",
];

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

/// Server configuration.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// Account created when the account store is empty
    pub seed: SeedCredentials,
    /// Directory served for static assets
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Username and password installed by the first-run seed.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SeedCredentials {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for SeedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Default for SeedCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_SEED_USERNAME.to_owned(),
            password: SecretString::from(DEFAULT_SEED_PASSWORD),
        }
    }
}

impl SeedCredentials {
    /// Load the seed pair, falling back to `admin` / `admin`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            username: env_var("VERTEBRA_SEED_USERNAME")
                .unwrap_or_else(|| DEFAULT_SEED_USERNAME.to_owned()),
            password: SecretString::from(
                env_var("VERTEBRA_SEED_PASSWORD")
                    .unwrap_or_else(|| DEFAULT_SEED_PASSWORD.to_owned()),
            ),
        }
    }

    /// Whether the built-in default pair is in use.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.username == DEFAULT_SEED_USERNAME
            && self.password.expose_secret() == DEFAULT_SEED_PASSWORD
    }
}

impl CmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let database_url = env_var("VERTEBRA_DATABASE_URL")
            .or_else(|| env_var("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("VERTEBRA_DATABASE_URL".to_string()))?;

        let host: IpAddr = parse_env("VERTEBRA_HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = parse_env("VERTEBRA_PORT", 3000)?;
        let base_url =
            env_var("VERTEBRA_BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}"));

        let session_secret = env_var(SESSION_SECRET_VAR)
            .ok_or_else(|| ConfigError::MissingEnvVar(SESSION_SECRET_VAR.to_string()))?;
        check_session_secret(&session_secret)
            .map_err(|reason| ConfigError::InsecureSecret(SESSION_SECRET_VAR.to_string(), reason))?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret: SecretString::from(session_secret),
            seed: SeedCredentials::from_env(),
            static_dir: env_var("VERTEBRA_STATIC_DIR")
                .map_or_else(|| PathBuf::from("crates/server/public"), PathBuf::from),
            sentry_dsn: env_var("SENTRY_DSN"),
            sentry_environment: env_var("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (controls the `Secure` cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

/// A set, non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Parse an optional environment variable, using `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

// =============================================================================
// Session secret checks
// =============================================================================

/// Reject short, placeholder-looking, or low-entropy session secrets.
///
/// Returns the reason on failure.
fn check_session_secret(secret: &str) -> Result<(), String> {
    let length = secret.chars().count();
    if length < MIN_SESSION_SECRET_LENGTH {
        return Err(format!(
            "must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {length})"
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(format!("looks like a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    let total = counts.values().sum::<usize>() as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum()
}
