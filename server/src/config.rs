//! Process configuration read from the environment.
//!
//! | Variable       | Default            |
//! |----------------|--------------------|
//! | `HOST`         | `0.0.0.0`          |
//! | `PORT`         | `3000`             |
//! | `RUST_LOG`     | `info`             |
//! | `DATABASE_URL` | unset: memory only |
//!
//! `DATABASE_URL` names an SQLite file, either as a bare path or as
//! `sqlite://path`. Empty values count as unset.

use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid HOST `{value}`: {source}")]
    InvalidHost {
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid PORT `{value}`: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_filter: String,
    pub database_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            database_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("HOST") {
            config.host = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidHost { value, source })?;
        }
        if let Some(value) = get("PORT") {
            config.port = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?;
        }
        if let Some(value) = get("RUST_LOG") {
            config.log_filter = value;
        }
        if let Some(value) = get("DATABASE_URL") {
            let value = value.trim();
            let path = value
                .strip_prefix("sqlite://")
                .or_else(|| value.strip_prefix("sqlite:"))
                .unwrap_or(value);
            config.database_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("RUST_LOG", "timesheet_server=debug"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_filter, "timesheet_server=debug");
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", ""), ("HOST", "  ")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn database_url_accepts_bare_path_and_sqlite_scheme() {
        for url in [
            "/var/lib/timesheet.db",
            "sqlite:///var/lib/timesheet.db",
            "sqlite:/var/lib/timesheet.db",
        ] {
            let config = Config::from_lookup(lookup(&[("DATABASE_URL", url)])).unwrap();
            assert_eq!(
                config.database_path,
                Some(PathBuf::from("/var/lib/timesheet.db")),
                "{url}"
            );
        }
    }

    #[test]
    fn database_is_optional() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "")])).unwrap();
        assert!(config.database_path.is_none());
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { ref value, .. } if value == "http"));
        assert!(err.to_string().starts_with("invalid PORT `http`"));
    }

    #[test]
    fn rejects_out_of_range_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }

    #[test]
    fn rejects_bad_host() {
        let err = Config::from_lookup(lookup(&[("HOST", "localhost:80")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }
}
