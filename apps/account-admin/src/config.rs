//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, bail};
use sea_orm::IsolationLevel;
use tutor_infra::{DatabaseConfig, UnitConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub unit: UnitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let mut database = DatabaseConfig::new(url);
        if let Some(max) = lookup("DB_MAX_CONNECTIONS").and_then(|s| s.parse().ok()) {
            database.max_connections = max;
        }
        if let Some(min) = lookup("DB_MIN_CONNECTIONS").and_then(|s| s.parse().ok()) {
            database.min_connections = min;
        }
        database.sql_logging = lookup("DB_SQL_LOGGING")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let unit = UnitConfig {
            save_timeout: lookup("UNIT_SAVE_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis),
            isolation: lookup("UNIT_ISOLATION")
                .map(|v| parse_isolation(&v))
                .transpose()?,
        };

        Ok(Self { database, unit })
    }
}

fn parse_isolation(value: &str) -> anyhow::Result<IsolationLevel> {
    match value.to_lowercase().as_str() {
        "read-committed" => Ok(IsolationLevel::ReadCommitted),
        "repeatable-read" => Ok(IsolationLevel::RepeatableRead),
        "serializable" => Ok(IsolationLevel::Serializable),
        other => bail!("unknown UNIT_ISOLATION level: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/tutor")]).unwrap();

        assert_eq!(config.database.url, "postgres://localhost/tutor");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert!(!config.database.sql_logging);
        assert!(config.unit.save_timeout.is_none());
        assert!(config.unit.isolation.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/tutor"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("DB_SQL_LOGGING", "1"),
            ("UNIT_SAVE_TIMEOUT_MS", "250"),
            ("UNIT_ISOLATION", "Serializable"),
        ])
        .unwrap();

        assert_eq!(config.database.max_connections, 4);
        assert!(config.database.sql_logging);
        assert_eq!(config.unit.save_timeout, Some(Duration::from_millis(250)));
        assert!(matches!(
            config.unit.isolation,
            Some(IsolationLevel::Serializable)
        ));
    }

    #[test]
    fn test_missing_url_and_bad_isolation_fail() {
        assert!(load(&[]).is_err());
        assert!(
            load(&[
                ("DATABASE_URL", "postgres://localhost/tutor"),
                ("UNIT_ISOLATION", "chaos"),
            ])
            .is_err()
        );
    }
}
