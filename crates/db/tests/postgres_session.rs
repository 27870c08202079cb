//! Live Postgres checks. Run with `DATABASE_URL` set and `--ignored`.

use std::sync::Arc;

use adminrun_core::environment::Environment;
use adminrun_db::{ConnectionParams, PgConnectionManager, PgConnector, StaticCredentials};

fn manager() -> PgConnectionManager {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for live tests");
    let credentials = StaticCredentials::new().with(Environment::Dev, "orders", ConnectionParams::new().with("url", url));
    PgConnectionManager::new(Environment::Dev, Arc::new(credentials), PgConnector::new("adminrun-tests"))
}

/// Two sequential cursors for one database run on the same backend session.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn sequential_cursors_share_backend_pid() {
    let manager = manager();

    let first: (i32,) = {
        let mut cursor = manager.get_cursor("orders").await.unwrap();
        sqlx::query_as("SELECT pg_backend_pid()")
            .fetch_one(&mut *cursor)
            .await
            .unwrap()
    };
    let second: (i32,) = {
        let mut cursor = manager.get_cursor("orders").await.unwrap();
        sqlx::query_as("SELECT pg_backend_pid()")
            .fetch_one(&mut *cursor)
            .await
            .unwrap()
    };

    assert_eq!(first.0, second.0);
    assert_eq!(manager.connections_opened().await, 1);
    manager.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn fetch_all_binds_json_parameters() {
    use sqlx::Row;

    let manager = manager();
    let rows = manager
        .fetch_all(
            "orders",
            "SELECT $1::bigint + 1 AS next, $2::text AS label",
            &[serde_json::json!(41), serde_json::json!("answer")],
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<i64, _>("next"), 42);
    assert_eq!(rows[0].get::<String, _>("label"), "answer");
    manager.shutdown().await;
}

/// A JSON null binds as a text-typed NULL; a cast in the statement is what
/// lets it meet a column of another type.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn null_binds_follow_statement_casts() {
    use sqlx::Row;

    let manager = manager();
    let rows = manager
        .fetch_all(
            "orders",
            "SELECT COALESCE($1::boolean, true) AS active, COALESCE($2::text, 'none') AS email",
            &[serde_json::Value::Null, serde_json::Value::Null],
        )
        .await
        .unwrap();

    assert!(rows[0].get::<bool, _>("active"));
    assert_eq!(rows[0].get::<String, _>("email"), "none");
    manager.shutdown().await;
}
