use std::env;
use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub credentials: Option<(String, String)>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub recipient: String,
    pub mail_from: String,
    pub site_name: String,
    pub smtp: SmtpSettings,
    pub bind_addr: SocketAddr,
    pub static_dir: Option<String>,
    pub sentry_dsn: Option<String>,
}

const DEFAULT_SITE_NAME: &str = "JDD PAINTING";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SMTP_PORT: u16 = 587;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup so tests don't have to touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let recipient = require("CONTACT_RECIPIENT")?;
        let mail_from = require("MAIL_FROM")?;
        for (name, value) in [("CONTACT_RECIPIENT", &recipient), ("MAIL_FROM", &mail_from)] {
            if value.parse::<lettre::Address>().is_err() {
                return Err(ConfigError::Invalid { name, value: value.clone() });
            }
        }

        let port = match get("SMTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "SMTP_PORT", value: raw })?,
            None => DEFAULT_SMTP_PORT,
        };

        let credentials = match (get("SMTP_USERNAME"), get("SMTP_PASSWORD")) {
            (Some(user), Some(pass)) => Some((user, pass)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("SMTP_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("SMTP_USERNAME")),
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid { name: "BIND_ADDR", value: bind_raw.clone() })?;

        Ok(Config {
            recipient,
            mail_from,
            site_name: get("SITE_NAME").unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            smtp: SmtpSettings {
                host: require("SMTP_HOST")?,
                port,
                credentials,
            },
            bind_addr,
            static_dir: get("STATIC_DIR"),
            sentry_dsn: get("SENTRY_DSN"),
        })
    }
}
