use crate::config::ConnectionConfig;

/// Path used for a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Switch file databases to WAL journaling on open.
    pub wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self { db_path, wal: true }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH.to_string())
    }

    #[must_use]
    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }

    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.db_path.is_empty() || self.db_path == MEMORY_PATH
    }
}

impl From<&ConnectionConfig> for SqliteOptions {
    fn from(config: &ConnectionConfig) -> Self {
        SqliteOptions::new(config.database.clone())
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_detection() {
        assert!(SqliteOptions::in_memory().is_memory());
        assert!(SqliteOptions::new(String::new()).is_memory());
        assert!(!SqliteOptions::new("/tmp/app.db".into()).is_memory());
    }

    #[test]
    fn options_from_connection_config() {
        let cfg = ConnectionConfig::builder("data.db").host("ignored").finish();
        let opts = SqliteOptions::from(&cfg);
        assert_eq!(opts.db_path, "data.db");
        assert!(opts.wal);
        let opts = SqliteOptionsBuilder::new("data.db".into()).wal(false).finish();
        assert!(!opts.wal);
    }
}
