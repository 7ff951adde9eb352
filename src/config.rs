use crate::handlers::validation::smtp::SmtpProbeSettings;
use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Service configuration, read from the environment after `.env` is loaded.
///
/// | Variable | Default |
/// |---|---|
/// | `HOST` | `127.0.0.1` |
/// | `PORT` | `8080` |
/// | `MAX_UPLOAD_BYTES` | `10485760` |
/// | `SMTP_PROBE_SENDER` | `verify@example.com` |
/// | `SMTP_HELO_NAME` | `example.com` |
/// | `SMTP_PORT` | `25` |
/// | `SMTP_TIMEOUT_SECS` | `5` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Limit for the JSON request body carrying both CSV uploads
    pub max_upload_bytes: usize,
    pub smtp: SmtpProbeSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            smtp: SmtpProbeSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Missing keys use the
    /// default; unparseable numbers are logged and use the default too.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            smtp: SmtpProbeSettings {
                sender: lookup("SMTP_PROBE_SENDER").unwrap_or(defaults.smtp.sender),
                helo_name: lookup("SMTP_HELO_NAME").unwrap_or(defaults.smtp.helo_name),
                port: parse_or(&lookup, "SMTP_PORT", defaults.smtp.port),
                timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "SMTP_TIMEOUT_SECS",
                    defaults.smtp.timeout.as_secs(),
                )),
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not a valid value, using {default}");
            default
        }),
    }
}
