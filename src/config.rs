use std::env;

use crate::error::ConfigError;

/// Development-only signing secret used when `JWT_SECRET` is unset locally.
pub const LOCAL_JWT_SECRET: &str = "scholar-stream-local-development-secret";

/// Default document-store database name.
pub const DEFAULT_DB_NAME: &str = "scholarStreamDB";

/// Browser origins that are always allowed alongside `CLIENT_URL`.
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

/// AppConfig
///
/// Immutable configuration resolved once at startup and shared through the
/// application state. Handlers pull it out with `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Runtime environment marker. Controls which variables are mandatory.
    pub env: Env,
    /// Document store connection string.
    pub mongo_uri: String,
    /// Database holding the users, scholarships, applications and reviews collections.
    pub db_name: String,
    /// Shared secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// TCP port the HTTP server binds to.
    pub port: u16,
    /// Front-end origin allowed by CORS in addition to the dev origins.
    pub client_url: Option<String>,
    /// Payment processor secret key. Empty means payments are not configured.
    pub stripe_secret_key: String,
}

/// Env
///
/// Local runs get fallbacks for everything; production must be explicit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-secret values for test scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            port: 5000,
            client_url: None,
            stripe_secret_key: String::new(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` when a variable required for the current
    /// environment is absent and `ConfigError::Invalid` when `PORT` does not
    /// parse.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// from_lookup
    ///
    /// Builds the configuration from an arbitrary key lookup. Blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let env = match get("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };
        let defaults = Self::default();

        let required = |key: &'static str, fallback: &str| -> Result<String, ConfigError> {
            match (get(key), env) {
                (Some(value), _) => Ok(value),
                (None, Env::Local) => Ok(fallback.to_string()),
                (None, Env::Production) => Err(ConfigError::Missing(key)),
            }
        };

        let mongo_uri = required("MONGODB_URI", &defaults.mongo_uri)?;
        let jwt_secret = required("JWT_SECRET", LOCAL_JWT_SECRET)?;
        let port_raw = required("PORT", &defaults.port.to_string())?;
        let port = port_raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port_raw.clone(),
        })?;

        let client_url = get("CLIENT_URL");
        if env == Env::Production && client_url.is_none() {
            return Err(ConfigError::Missing("CLIENT_URL"));
        }

        Ok(Self {
            env,
            mongo_uri,
            db_name: get("MONGODB_DB").unwrap_or(defaults.db_name),
            jwt_secret,
            port,
            client_url,
            stripe_secret_key: get("STRIPE_SECRET_KEY").unwrap_or_default(),
        })
    }

    /// Every origin the CORS layer should accept.
    pub fn allowed_origins(&self) -> Vec<String> {
        DEV_ORIGINS
            .iter()
            .map(|origin| origin.to_string())
            .chain(self.client_url.clone())
            .collect()
    }
}
