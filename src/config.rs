use std::env;

/// Runtime settings read from the environment (and `.env` via dotenvy).
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    /// Base of the out-of-band verification link, e.g. `https://host/verify`.
    pub verification_base_url: Option<String>,
    pub cors_allow_origin: Option<String>,
    pub log_format: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid value: {value}")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_port: parsed("SERVER_PORT", 8089)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_secs: parsed("JWT_TTL_SECS", 86_400)?,
            verification_base_url: optional("VERIFICATION_BASE_URL"),
            cors_allow_origin: optional("CORS_ALLOW_ORIGIN"),
            log_format: optional("RUST_LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            otlp_endpoint: optional("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
