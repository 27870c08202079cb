//! How physical connections are opened and closed.
//!
//! The pool is generic over [`Connector`] so it can be exercised without a
//! server (the `memory` module, behind the `testing` feature);
//! [`PgConnector`] is the real one.

use std::future::Future;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::ConnectOptions;

use crate::credentials::ConnectionParams;
use crate::error::DbError;

/// A single open physical connection.
pub trait DbConnection: Send + 'static {
    /// Gracefully terminate the connection.
    fn close(self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

/// Opens physical connections from credential parameters.
pub trait Connector: Send + Sync + 'static {
    type Connection: DbConnection;

    fn connect(
        &self,
        db_name: &str,
        params: &ConnectionParams,
    ) -> impl Future<Output = Result<Self::Connection, DbError>> + Send;
}

impl DbConnection for PgConnection {
    async fn close(self) -> Result<(), sqlx::Error> {
        <PgConnection as sqlx::Connection>::close(self).await
    }
}

/// Opens one [`PgConnection`] per request.
///
/// Recognised parameter keys:
///
/// | Key                  | Meaning                                    |
/// |----------------------|--------------------------------------------|
/// | `url`                | base connection URL, other keys override it |
/// | `host`               | server host                                |
/// | `port`               | server port                                |
/// | `user` / `username`  | role to connect as                         |
/// | `password`           | role password                              |
/// | `database` / `dbname`| database on the server                     |
/// | `sslmode`            | `disable`, `prefer`, `require`, ...        |
/// | `application_name`   | reported in `pg_stat_activity`             |
///
/// Any other key is rejected so typos surface before connecting.
#[derive(Debug, Clone)]
pub struct PgConnector {
    application_name: String,
}

impl PgConnector {
    /// `application_name` is used unless the credentials set their own.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
        }
    }

    /// Translate credential parameters into sqlx connect options.
    pub fn connect_options(&self, db_name: &str, params: &ConnectionParams) -> Result<PgConnectOptions, DbError> {
        let invalid = |message: String| DbError::InvalidCredentials {
            location: format!("parameters for '{db_name}'"),
            message,
        };

        let mut options = match params.get("url") {
            Some(url) => PgConnectOptions::from_str(url).map_err(|e| invalid(format!("url: {e}")))?,
            None => PgConnectOptions::new(),
        };
        options = options.application_name(&self.application_name);

        for (key, value) in params.iter() {
            options = match key {
                "url" => options,
                "host" => options.host(value),
                "port" => {
                    let port = value
                        .parse::<u16>()
                        .map_err(|_| invalid(format!("port '{value}' is not a valid port number")))?;
                    options.port(port)
                }
                "user" | "username" => options.username(value),
                "password" => options.password(value),
                "database" | "dbname" => options.database(value),
                "sslmode" => {
                    let mode = PgSslMode::from_str(value)
                        .map_err(|_| invalid(format!("unknown sslmode '{value}'")))?;
                    options.ssl_mode(mode)
                }
                "application_name" => options.application_name(value),
                "search_path" => options.options([("search_path", value)]),
                other => return Err(invalid(format!("unknown parameter '{other}'"))),
            };
        }

        Ok(options)
    }
}

impl Default for PgConnector {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

impl Connector for PgConnector {
    type Connection = PgConnection;

    async fn connect(&self, db_name: &str, params: &ConnectionParams) -> Result<PgConnection, DbError> {
        let options = self.connect_options(db_name, params)?;
        options.connect().await.map_err(|source| DbError::Connect {
            db_name: db_name.to_string(),
            source,
        })
    }
}
