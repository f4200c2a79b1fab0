use crate::error::AppError;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use url::Url;
use validator::Validate;

use crate::actors::SupervisorOptions;

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable `fmt` output
    Pretty,
    /// Bunyan JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Service configuration, read from `HOA_*` environment variables.
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub public_url: Url,
    #[validate(range(max = 60000))]
    pub response_delay_ms: u64,
    #[validate(range(min = 1, max = 600))]
    pub reply_timeout_secs: u64,
    #[validate(range(min = 1, max = 3))]
    pub source_link_limit: usize,
    #[validate(range(min = 1))]
    pub max_upload_bytes: u64,
    #[validate(length(min = 1))]
    pub default_user: String,
    pub log_format: LogFormat,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", name, raw, e))),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Loads `.env` when present, then reads the environment.
    pub fn from_env() -> Result<Self, AppError> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }
        Self::from_vars()
    }

    /// Reads the environment without touching `.env`.
    pub fn from_vars() -> Result<Self, AppError> {
        let data_dir = PathBuf::from(var("HOA_DATA_DIR").unwrap_or_else(|| "./data".to_string()));
        let database_url = var("HOA_DATABASE_URL").unwrap_or_else(|| {
            format!(
                "sqlite://{}",
                data_dir.join("db").join("hoa_assistant.sqlite").to_string_lossy()
            )
        });
        let public_url = var("HOA_PUBLIC_URL")
            .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
        let public_url = Url::parse(&public_url)
            .map_err(|e| AppError::Config(format!("HOA_PUBLIC_URL: {}", e)))?;

        let config = Self {
            data_dir,
            database_url,
            bind_addr: parse_var("HOA_BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 5000)))?,
            public_url,
            response_delay_ms: parse_var("HOA_RESPONSE_DELAY_MS", 1500)?,
            reply_timeout_secs: parse_var("HOA_REPLY_TIMEOUT_SECS", 30)?,
            source_link_limit: parse_var("HOA_SOURCE_LINK_LIMIT", 3)?,
            max_upload_bytes: parse_var("HOA_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            default_user: var("HOA_DEFAULT_USER").unwrap_or_else(|| "demo-user".to_string()),
            log_format: match var("HOA_LOG_FORMAT") {
                Some(raw) => raw.parse()?,
                None => LogFormat::Pretty,
            },
        };

        config
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn supervisor_options(&self) -> SupervisorOptions {
        SupervisorOptions {
            response_delay: Duration::from_millis(self.response_delay_ms),
            reply_timeout: Duration::from_secs(self.reply_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 10] = [
        "HOA_DATA_DIR",
        "HOA_DATABASE_URL",
        "HOA_BIND_ADDR",
        "HOA_PUBLIC_URL",
        "HOA_RESPONSE_DELAY_MS",
        "HOA_REPLY_TIMEOUT_SECS",
        "HOA_SOURCE_LINK_LIMIT",
        "HOA_MAX_UPLOAD_BYTES",
        "HOA_DEFAULT_USER",
        "HOA_LOG_FORMAT",
    ];

    fn with_vars<F: FnOnce()>(set: &[(&str, &str)], f: F) {
        let mut vars: Vec<(&str, Option<&str>)> = VARS.iter().map(|k| (*k, None)).collect();
        for (key, value) in set {
            if let Some(slot) = vars.iter_mut().find(|(k, _)| k == key) {
                slot.1 = Some(*value);
            }
        }
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_defaults() {
        with_vars(&[], || {
            let config = AppConfig::from_vars().unwrap();
            assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
            assert_eq!(config.response_delay_ms, 1500);
            assert_eq!(config.source_link_limit, 3);
            assert_eq!(config.default_user, "demo-user");
            assert_eq!(config.log_format, LogFormat::Pretty);
            assert!(config.database_url.ends_with("hoa_assistant.sqlite"));
        });
    }

    #[test]
    fn test_overrides() {
        with_vars(
            &[
                ("HOA_RESPONSE_DELAY_MS", "0"),
                ("HOA_SOURCE_LINK_LIMIT", "2"),
                ("HOA_LOG_FORMAT", "json"),
            ],
            || {
                let config = AppConfig::from_vars().unwrap();
                assert_eq!(config.response_delay_ms, 0);
                assert_eq!(config.source_link_limit, 2);
                assert_eq!(config.log_format, LogFormat::Json);
                assert_eq!(config.supervisor_options().response_delay, Duration::ZERO);
            },
        );
    }

    #[test]
    fn test_invalid_values() {
        with_vars(&[("HOA_SOURCE_LINK_LIMIT", "4")], || {
            assert!(matches!(AppConfig::from_vars(), Err(AppError::Config(_))));
        });
        with_vars(&[("HOA_SOURCE_LINK_LIMIT", "0")], || {
            assert!(matches!(AppConfig::from_vars(), Err(AppError::Config(_))));
        });
        with_vars(&[("HOA_RESPONSE_DELAY_MS", "soon")], || {
            assert!(matches!(AppConfig::from_vars(), Err(AppError::Config(_))));
        });
        with_vars(&[("HOA_PUBLIC_URL", "not a url")], || {
            assert!(matches!(AppConfig::from_vars(), Err(AppError::Config(_))));
        });
    }
}
