use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::spawn_blocking;

use crate::config::ConnectionConfig;
use crate::driver::{Connect, Connection};
use crate::error::SqlFluentError;
use crate::session::Session;

/// Shared handle that runs blocking session work on tokio's blocking pool.
///
/// Each [`AsyncSession::run`] call holds the session lock for the whole closure, so a
/// build-and-execute sequence never interleaves with another task's statement.
pub struct AsyncSession<C: Connection> {
    inner: Arc<Mutex<Session<C>>>,
}

impl<C: Connection> Clone for AsyncSession<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> AsyncSession<C>
where
    C: Connection + Send + 'static,
{
    #[must_use]
    pub fn new(session: Session<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Open a connection on the blocking pool.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if the driver cannot connect.
    pub async fn connect(config: ConnectionConfig) -> Result<Self, SqlFluentError>
    where
        C: Connect,
    {
        let session = spawn_blocking(move || Session::<C>::connect(&config)).await??;
        Ok(Self::new(session))
    }

    /// Run `func` with exclusive access to the session.
    ///
    /// # Errors
    /// Returns whatever `func` returns, or `SqlFluentError::Other` if the blocking task panics.
    pub async fn run<F, R>(&self, func: F) -> Result<R, SqlFluentError>
    where
        F: FnOnce(&mut Session<C>) -> Result<R, SqlFluentError> + Send + 'static,
        R: Send + 'static,
    {
        let session = Arc::clone(&self.inner);
        spawn_blocking(move || {
            let mut guard = session.blocking_lock();
            func(&mut guard)
        })
        .await?
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::results::QueryResult;
    use crate::sqlite::SqliteConnection;
    use crate::types::{RowData, RowValues};
    use tokio::runtime::Runtime;

    #[test]
    fn run_executes_on_blocking_pool() -> Result<(), Box<dyn std::error::Error>> {
        let rt = Runtime::new()?;
        rt.block_on(async {
            let session = AsyncSession::<SqliteConnection>::connect(
                ConnectionConfig::builder(":memory:").finish(),
            )
            .await?;
            session
                .run(|s| {
                    s.query("CREATE TABLE kv (k TEXT PRIMARY KEY, v INTEGER)")?
                        .into_result()
                })
                .await?;

            let writer = session.clone();
            let inserted = writer
                .run(|s| {
                    s.builder()
                        .insert("kv", RowData::new().set("k", "a").set("v", 1))
                })
                .await?;
            assert!(matches!(inserted, QueryResult::GeneratedId(1)));

            let v = session
                .run(|s| s.builder().where_clause("k", "a").get_var("kv", "v"))
                .await?;
            assert_eq!(v, Some(RowValues::Int(1)));
            Ok::<_, SqlFluentError>(())
        })?;
        Ok(())
    }
}
