#![cfg(feature = "sqlite")]

use sql_fluent::prelude::*;

fn session() -> Result<Session<SqliteConnection>, SqlFluentError> {
    let session = Session::new(SqliteConnection::open_in_memory()?);
    session.connection().execute_batch(
        "CREATE TABLE accounts (id INTEGER PRIMARY KEY, email TEXT UNIQUE NOT NULL);
         INSERT INTO accounts (email) VALUES ('a@x.io');",
    )?;
    Ok(session)
}

#[test]
fn prepare_failure_is_captured_with_sql() -> Result<(), SqlFluentError> {
    let mut s = session()?;
    let result = s.builder().where_clause("id", 1).get("missing_table", &[])?;

    match &result {
        QueryResult::Failure(DbFailure::PrepareFailed { sql, message }) => {
            assert_eq!(sql, "SELECT * FROM missing_table WHERE id = ?");
            assert!(message.contains("no such table"), "{message}");
        }
        other => panic!("expected prepare failure, got {other:?}"),
    }
    assert_eq!(s.last_query(), Some("SELECT * FROM missing_table WHERE id = ?"));
    assert!(matches!(
        s.last_error(),
        Some(DbFailure::PrepareFailed { .. })
    ));
    assert!(matches!(
        result.into_result(),
        Err(SqlFluentError::PrepareFailed { .. })
    ));
    Ok(())
}

#[test]
fn constraint_violation_is_execute_failure() -> Result<(), SqlFluentError> {
    let mut s = session()?;
    let result = s
        .builder()
        .insert("accounts", RowData::new().set("email", "a@x.io"))?;
    match result {
        QueryResult::Failure(DbFailure::ExecuteFailed { message }) => {
            assert!(message.contains("UNIQUE"), "{message}");
        }
        other => panic!("expected execute failure, got {other:?}"),
    }
    assert!(s.last_error().is_some());
    assert_eq!(s.insert_id(), 0);

    // the next statement starts with a clean slate
    s.builder().get("accounts", &["id"])?.into_result()?;
    assert!(s.last_error().is_none());
    Ok(())
}

#[test]
fn convenience_views_surface_failures_as_errors() -> Result<(), SqlFluentError> {
    let mut s = session()?;
    assert!(matches!(
        s.builder().get_col("nope", "id"),
        Err(SqlFluentError::PrepareFailed { .. })
    ));
    assert!(matches!(
        s.builder().get_var("accounts", "no_such_column"),
        Err(SqlFluentError::PrepareFailed { .. })
    ));
    Ok(())
}

#[test]
fn empty_row_data_never_reaches_driver() -> Result<(), SqlFluentError> {
    let mut s = session()?;
    assert!(matches!(
        s.builder().insert("accounts", RowData::new()),
        Err(SqlFluentError::ConfigError(_))
    ));
    assert!(matches!(
        s.builder().where_clause("id", 1).update("accounts", RowData::new()),
        Err(SqlFluentError::ConfigError(_))
    ));
    assert_eq!(s.last_query(), None);
    Ok(())
}

#[test]
fn raw_query_parameter_count_is_checked() -> Result<(), SqlFluentError> {
    let mut s = session()?;
    assert!(matches!(
        s.raw_query("SELECT * FROM accounts WHERE id = ? AND email = ?", &[RowValues::Int(1)]),
        Err(SqlFluentError::ParameterError(_))
    ));
    assert_eq!(s.last_query(), None);

    // quoted markers are not placeholders
    let rows = s
        .raw_query("SELECT '?' AS q FROM accounts WHERE id = ?", &[RowValues::Int(1)])?
        .into_rows()?;
    assert_eq!(rows.scalar("q"), Some(RowValues::Text("?".into())));

    // numbered markers collapse in the driver
    assert!(matches!(
        s.raw_query("SELECT ?1 AS a, ?1 AS b", &[RowValues::Int(1), RowValues::Int(1)]),
        Err(SqlFluentError::ParameterError(_))
    ));
    assert_eq!(s.last_query(), Some("SELECT ?1 AS a, ?1 AS b"));
    assert!(s.last_error().is_some());
    Ok(())
}

#[test]
fn trailing_backslash_in_literal_does_not_hide_markers() -> Result<(), SqlFluentError> {
    let mut s = session()?;
    s.connection().execute_batch(
        r"CREATE TABLE files (id INTEGER PRIMARY KEY, path TEXT);
          INSERT INTO files (id, path) VALUES (1, 'C:\'), (2, 'D:\');",
    )?;

    let rows = s
        .raw_query(
            r"SELECT id FROM files WHERE path = 'C:\' AND id = ?",
            &[RowValues::Int(1)],
        )?
        .into_rows()?;
    assert_eq!(rows.column("id"), vec![RowValues::Int(1)]);

    let joined = s
        .builder()
        .join("files f2", r"f2.path = 'C:\'", "")?
        .where_clause("files.id", 2)
        .get("files", &["files.id"])?
        .into_rows()?;
    assert_eq!(joined.column("id"), vec![RowValues::Int(2)]);
    assert_eq!(
        s.last_query(),
        Some(r"SELECT files.id FROM files JOIN files f2 ON f2.path = 'C:\' WHERE files.id = ?")
    );
    Ok(())
}

#[test]
fn escape_is_available_for_hand_written_literals() -> Result<(), SqlFluentError> {
    let mut s = session()?;
    let email = s.escape("o'hara@x.io");
    assert_eq!(email, "o''hara@x.io");
    s.query(&format!("INSERT INTO accounts (email) VALUES ('{email}')"))?
        .into_result()?;
    let found = s
        .builder()
        .where_clause("email", "o'hara@x.io")
        .get_var("accounts", "email")?;
    assert_eq!(found, Some(RowValues::Text("o'hara@x.io".into())));
    Ok(())
}
