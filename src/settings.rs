//! Startup settings.
//!
//! Read once from the process environment:
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `SECRET_KEY` | (required) | signs flash cookies |
//! | `FOLIO_HOST` | `127.0.0.1` | listen host |
//! | `FOLIO_PORT` | `8080` | listen port |
//! | `FOLIO_LOG_FORMAT` | `compact` | `compact` or `json` |

use std::fmt;

use serde::Deserialize;

use crate::error::Error;

const SECRET_KEY_VAR: &str = "SECRET_KEY";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Clone, Deserialize)]
pub struct Settings {
    pub secret_key: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(None)
    }

    /// Loads settings from `vars` instead of the process environment when
    /// given. A missing or empty `SECRET_KEY` is an error.
    pub fn load_from(vars: Option<config::Map<String, String>>) -> Result<Self, Error> {
        let secret = match &vars {
            Some(vars) => vars.get(SECRET_KEY_VAR).cloned(),
            None => std::env::var(SECRET_KEY_VAR).ok(),
        };
        let secret = secret
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingSetting(SECRET_KEY_VAR))?;

        let settings = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("log_format", "compact")?
            .add_source(config::Environment::with_prefix("FOLIO").source(vars))
            .set_override("secret_key", secret)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Settings for tests and embedders that already hold a key.
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            host: "127.0.0.1".to_owned(),
            port: 8080,
            log_format: LogFormat::Compact,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("secret_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = Settings::load_from(vars(&[("FOLIO_PORT", "9000")])).unwrap_err();
        assert!(matches!(err, Error::MissingSetting("SECRET_KEY")));
    }

    #[test]
    fn empty_secret_is_fatal() {
        let err = Settings::load_from(vars(&[("SECRET_KEY", "")])).unwrap_err();
        assert!(matches!(err, Error::MissingSetting(_)));
    }

    #[test]
    fn defaults_apply() {
        let settings = Settings::load_from(vars(&[("SECRET_KEY", "s3cret")])).unwrap();
        assert_eq!(settings.secret_key, "s3cret");
        assert_eq!(settings.listen_addr(), "127.0.0.1:8080");
        assert_eq!(settings.log_format, LogFormat::Compact);
    }

    #[test]
    fn prefixed_overrides() {
        let settings = Settings::load_from(vars(&[
            ("SECRET_KEY", "s3cret"),
            ("FOLIO_HOST", "0.0.0.0"),
            ("FOLIO_PORT", "9000"),
            ("FOLIO_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(settings.listen_addr(), "0.0.0.0:9000");
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn debug_hides_secret() {
        let shown = format!("{:?}", Settings::with_secret("hunter2"));
        assert!(!shown.contains("hunter2"));
    }
}
