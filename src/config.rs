use serde::Deserialize;

use crate::error::SqlFluentError;
use crate::types::OutputMode;

/// Connection parameters handed to a [`Connect`](crate::driver::Connect) implementation.
///
/// Server drivers read every field. The SQLite driver only reads `database`, which is a file path
/// or `:memory:`.
///
/// Configs deserialize from JSON:
/// ```rust
/// use sql_fluent::prelude::*;
///
/// let cfg: ConnectionConfig = serde_json::from_str(r#"{"database": ":memory:"}"#).unwrap();
/// assert_eq!(cfg.port, None);
/// assert_eq!(cfg.output_mode, OutputMode::Object);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: Option<u16>,
    /// Record shape used by raw queries and by builders that do not set their own.
    pub output_mode: OutputMode,
}

impl ConnectionConfig {
    #[must_use]
    pub fn builder(database: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new(database)
    }

    /// Parse a JSON document into a config.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConfigError` if the document is not a valid config.
    pub fn from_json(text: &str) -> Result<Self, SqlFluentError> {
        serde_json::from_str(text)
            .map_err(|e| SqlFluentError::ConfigError(format!("invalid connection config: {e}")))
    }
}

/// Fluent builder for [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    cfg: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            cfg: ConnectionConfig {
                database: database.into(),
                ..ConnectionConfig::default()
            },
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.cfg.host = host.into();
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.cfg.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.cfg.password = password.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.cfg.port = Some(port);
        self
    }

    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.cfg.output_mode = mode;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectionConfig {
        self.cfg
    }
}
