//! Named, environment-scoped database connections.
//!
//! Scripts talk to [`ConnectionManager`]; it forwards to a
//! [`ConnectionPool`] bound to the current [`Environment`] that opens at most
//! one connection per logical database name, on first use.
//!
//! [`Environment`]: adminrun_core::environment::Environment

pub mod connector;
pub mod credentials;
pub mod error;
pub mod handle;
pub mod manager;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod pool;
pub mod sql;

pub use connector::{Connector, DbConnection, PgConnector};
pub use credentials::{ConnectionParams, CredentialSource, StaticCredentials, TomlCredentialFile};
pub use error::DbError;
pub use handle::{ConnectionHandle, Cursor};
pub use manager::ConnectionManager;
pub use pool::ConnectionPool;

/// The manager type used against real Postgres servers.
pub type PgConnectionManager = ConnectionManager<PgConnector>;
