use thiserror::Error;

/// Diagnostic reported by a driver collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", display_driver_error(.code.as_deref(), .message))]
pub struct DriverError {
    /// Driver-specific state code (SQLSTATE, SQLite result code name, ...)
    pub code: Option<String>,
    pub message: String,
}

fn display_driver_error(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("{code} {message}"),
        None => message.to_string(),
    }
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DriverError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(ffi_err, _) => {
                DriverError::new(err.to_string()).with_code(format!("{:?}", ffi_err.code))
            }
            _ => DriverError::new(err.to_string()),
        }
    }
}

/// Driver-side failure captured in a [`QueryResult::Failure`](crate::results::QueryResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbFailure {
    /// The driver rejected the SQL text; nothing was executed.
    #[error("Problem preparing query ({sql}) {message}")]
    PrepareFailed { sql: String, message: String },

    /// The statement was prepared but binding, execution, or fetching failed.
    #[error("Problem executing query: {message}")]
    ExecuteFailed { message: String },
}

#[derive(Debug, Error)]
pub enum SqlFluentError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("Problem preparing query ({sql}) {message}")]
    PrepareFailed { sql: String, message: String },

    #[error("SQL execution error: {0}")]
    ExecuteFailed(String),

    /// Compiled placeholders and bind values disagree. Always a bug in the compiler.
    #[error("Bind arity mismatch: {placeholders} placeholders but {values} values in ({sql})")]
    BindArityMismatch {
        sql: String,
        placeholders: usize,
        values: usize,
    },

    #[error("Other database error: {0}")]
    Other(String),
}

impl From<DbFailure> for SqlFluentError {
    fn from(failure: DbFailure) -> Self {
        match failure {
            DbFailure::PrepareFailed { sql, message } => {
                SqlFluentError::PrepareFailed { sql, message }
            }
            DbFailure::ExecuteFailed { message } => SqlFluentError::ExecuteFailed(message),
        }
    }
}

impl From<tokio::task::JoinError> for SqlFluentError {
    fn from(err: tokio::task::JoinError) -> Self {
        SqlFluentError::Other(format!("spawn_blocking join error: {err}"))
    }
}
