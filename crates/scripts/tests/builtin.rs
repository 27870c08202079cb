//! The shipped registry, dispatched against Postgres connectors that are
//! never asked to connect.

use std::sync::Arc;

use adminrun_core::environment::Environment;
use adminrun_db::{ConnectionManager, PgConnector, StaticCredentials};
use adminrun_scripts::builtin::builtin_registry;
use adminrun_scripts::{Dispatcher, RunError};
use assert_matches::assert_matches;
use serde_json::json;

fn manager() -> ConnectionManager<PgConnector> {
    ConnectionManager::new(Environment::Dev, Arc::new(StaticCredentials::new()), PgConnector::default())
}

#[tokio::test]
async fn ping_succeeds_in_every_environment() {
    let registry = builtin_registry().unwrap();
    let db = manager();
    let dispatcher = Dispatcher::new(&registry, &db);

    for env in Environment::ALL {
        dispatcher.run(env, "ping", &json!({})).await.unwrap();
    }
    assert_eq!(db.connections_opened().await, 0);
}

#[tokio::test]
async fn update_user_rejects_non_integer_id_before_connecting() {
    let registry = builtin_registry().unwrap();
    let db = manager();

    let err = Dispatcher::new(&registry, &db)
        .run(Environment::Dev, "update-user", &json!({"user_id": "abc"}))
        .await
        .unwrap_err();

    assert_matches!(&err, RunError::Validation(v) if v.has_field("user_id"));
    assert_eq!(db.connections_opened().await, 0);
    assert!(db.open_databases().await.is_empty());
}

#[tokio::test]
async fn update_user_without_credentials_is_a_configuration_error() {
    let registry = builtin_registry().unwrap();
    let db = manager();

    let err = Dispatcher::new(&registry, &db)
        .run(Environment::Stg, "update-user", &json!({"user_id": 7, "is_active": false}))
        .await
        .unwrap_err();

    assert_matches!(err, RunError::Configuration { .. });
}

#[tokio::test]
async fn session_info_requires_a_database_list() {
    let registry = builtin_registry().unwrap();
    let db = manager();
    let dispatcher = Dispatcher::new(&registry, &db);

    let err = dispatcher
        .run(Environment::Dev, "session-info", &json!({"databases": "users"}))
        .await
        .unwrap_err();
    assert_matches!(err, RunError::Validation(v) if v.has_field("databases"));

    let err = dispatcher
        .run(Environment::Dev, "session-info", &json!({"databases": []}))
        .await
        .unwrap_err();
    assert_matches!(err, RunError::Validation(v) if v.has_field("databases"));
}
