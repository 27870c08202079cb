//! One connection per database name, scoped to a single environment.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use adminrun_core::environment::Environment;
use tokio::sync::Mutex;

use crate::connector::{Connector, DbConnection};
use crate::credentials::CredentialSource;
use crate::error::DbError;
use crate::handle::{ConnectionHandle, Cursor, CursorGauge};

type HandleOf<K> = ConnectionHandle<<K as Connector>::Connection>;

/// Lazily opened connections for one environment, keyed by database name.
///
/// The name -> handle map is only mutated here: inserted by
/// [`get_connection`](Self::get_connection), removed by
/// [`close`](Self::close) / [`close_all`](Self::close_all). Creation runs
/// under the map lock, so concurrent callers never open two connections for
/// the same name.
pub struct ConnectionPool<K: Connector> {
    environment: Environment,
    credentials: Arc<dyn CredentialSource>,
    connector: Arc<K>,
    handles: Mutex<HashMap<String, HandleOf<K>>>,
    opened: AtomicUsize,
    gauge: Arc<CursorGauge>,
}

impl<K: Connector> ConnectionPool<K> {
    pub fn new(environment: Environment, credentials: Arc<dyn CredentialSource>, connector: Arc<K>) -> Self {
        Self::with_gauge(environment, credentials, connector, Arc::default())
    }

    /// A pool whose cursors are counted on `gauge`, shared with pools that
    /// came before it.
    pub(crate) fn with_gauge(
        environment: Environment,
        credentials: Arc<dyn CredentialSource>,
        connector: Arc<K>,
        gauge: Arc<CursorGauge>,
    ) -> Self {
        Self {
            environment,
            credentials,
            connector,
            handles: Mutex::new(HashMap::new()),
            opened: AtomicUsize::new(0),
            gauge,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Return the cached handle for `db_name`, opening one if needed.
    ///
    /// A cached handle that has been closed behind the pool's back is
    /// dropped and replaced. Failed attempts are never cached.
    pub async fn get_connection(&self, db_name: &str) -> Result<HandleOf<K>, DbError> {
        let mut handles = self.handles.lock().await;

        if let Some(handle) = handles.get(db_name) {
            if handle.is_live() {
                return Ok(handle.clone());
            }
            tracing::warn!(db_name, environment = %self.environment, "Cached connection was closed, reopening");
            handles.remove(db_name);
        }

        let params = self
            .credentials
            .lookup(self.environment, db_name)?
            .ok_or_else(|| DbError::MissingCredentials {
                db_name: db_name.to_string(),
                environment: self.environment,
                location: self.credentials.location(self.environment),
            })?;

        tracing::info!(db_name, environment = %self.environment, "Connecting to database");
        let conn = self.connector.connect(db_name, &params).await?;
        self.opened.fetch_add(1, Ordering::Relaxed);

        let handle = ConnectionHandle::new(db_name, self.environment, conn, Arc::clone(&self.gauge));
        tracing::debug!(db_name, handle_id = %handle.id(), "Connection cached");
        handles.insert(db_name.to_string(), handle.clone());
        Ok(handle)
    }

    /// [`get_connection`](Self::get_connection) plus exclusive access to it.
    ///
    /// The cursor must be dropped before another cursor for the same
    /// database can be taken.
    pub async fn get_cursor(&self, db_name: &str) -> Result<Cursor<K::Connection>, DbError> {
        self.get_connection(db_name).await?.cursor().await
    }

    /// Close and evict the connection for `db_name`. No-op if absent.
    pub async fn close(&self, db_name: &str) {
        let handle = self.handles.lock().await.remove(db_name);
        match handle {
            Some(handle) => close_handle(handle).await,
            None => {
                tracing::info!(db_name, environment = %self.environment, "No active connection to close");
            }
        }
    }

    /// Close and evict every connection. Safe to call repeatedly.
    pub async fn close_all(&self) {
        let drained: Vec<_> = self.handles.lock().await.drain().map(|(_, h)| h).collect();
        if drained.is_empty() {
            return;
        }

        tracing::info!(count = drained.len(), environment = %self.environment, "Closing all connections");
        for handle in drained {
            close_handle(handle).await;
        }
    }

    /// Names of databases with a cached handle, sorted.
    pub async fn open_databases(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handles.lock().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Physical connections opened over the life of this pool.
    pub fn connections_opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }
}

/// Close an evicted handle, logging any failure.
async fn close_handle<C: DbConnection>(handle: ConnectionHandle<C>) {
    let db_name = handle.db_name();
    match handle.close().await {
        Ok(true) => tracing::info!(db_name, environment = %handle.environment(), "Connection closed"),
        Ok(false) => tracing::debug!(db_name, "Connection was already closed"),
        Err(e) => tracing::warn!(db_name, error = %e, "Error while closing connection"),
    }
}
