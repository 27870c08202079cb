//! Query helpers for scripts running against Postgres.

use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::Postgres;

use crate::connector::PgConnector;
use crate::error::DbError;
use crate::manager::ConnectionManager;

impl ConnectionManager<PgConnector> {
    /// Run `sql` on the named database with positional JSON parameters
    /// (`$1`, `$2`, ...) and return every row.
    pub async fn fetch_all(&self, db_name: &str, sql: &str, params: &[Value]) -> Result<Vec<PgRow>, DbError> {
        let mut cursor = self.get_cursor(db_name).await?;
        bind_all(sqlx::query(sql), params)
            .fetch_all(&mut *cursor)
            .await
            .map_err(|source| DbError::Query {
                db_name: db_name.to_string(),
                source,
            })
    }

    /// Run a statement and return the number of affected rows.
    pub async fn execute(&self, db_name: &str, sql: &str, params: &[Value]) -> Result<u64, DbError> {
        let mut cursor = self.get_cursor(db_name).await?;
        bind_all(sqlx::query(sql), params)
            .execute(&mut *cursor)
            .await
            .map(|result| result.rows_affected())
            .map_err(|source| DbError::Query {
                db_name: db_name.to_string(),
                source,
            })
    }
}

fn bind_all<'q>(
    query: Query<'q, Postgres, PgArguments>,
    params: &[Value],
) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(query, bind_json)
}

/// Scalars bind as their natural Postgres type; arrays and objects as JSONB.
fn bind_json<'q>(query: Query<'q, Postgres, PgArguments>, value: &Value) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(sqlx::types::Json(other.clone())),
    }
}
