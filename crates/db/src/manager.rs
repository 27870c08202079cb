//! The environment-scoped facade scripts use for every database operation.

use std::sync::Arc;

use adminrun_core::environment::Environment;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::connector::Connector;
use crate::credentials::CredentialSource;
use crate::error::DbError;
use crate::handle::{ConnectionHandle, Cursor, CursorGauge};
use crate::pool::ConnectionPool;

/// Holds the current environment and forwards to the pool bound to it.
///
/// Created once per process and passed by reference to the dispatcher and
/// scripts. A switch of environment (or [`shutdown`](Self::shutdown)) first
/// waits until no cursor is outstanding, then takes the write lock and closes
/// every connection of the old pool before the new pool exists. No two
/// environments' connections are ever open at the same time.
///
/// The write lock is never held while waiting on a cursor, so a task holding
/// a cursor can keep using the facade while a switch is pending.
pub struct ConnectionManager<K: Connector> {
    credentials: Arc<dyn CredentialSource>,
    connector: Arc<K>,
    gauge: Arc<CursorGauge>,
    pool: RwLock<ConnectionPool<K>>,
}

impl<K: Connector> ConnectionManager<K> {
    pub fn new(environment: Environment, credentials: Arc<dyn CredentialSource>, connector: K) -> Self {
        let connector = Arc::new(connector);
        let gauge = Arc::new(CursorGauge::default());
        let pool = ConnectionPool::with_gauge(
            environment,
            Arc::clone(&credentials),
            Arc::clone(&connector),
            Arc::clone(&gauge),
        );
        Self {
            credentials,
            connector,
            gauge,
            pool: RwLock::new(pool),
        }
    }

    pub async fn environment(&self) -> Environment {
        self.pool.read().await.environment()
    }

    pub fn connector(&self) -> &K {
        &self.connector
    }

    /// Close every connection of the current environment, then rebind to a
    /// fresh pool for `environment`.
    pub async fn set_environment(&self, environment: Environment) {
        let mut pool = self.write_when_idle().await;
        let previous = pool.environment();
        pool.close_all().await;
        *pool = ConnectionPool::with_gauge(
            environment,
            Arc::clone(&self.credentials),
            Arc::clone(&self.connector),
            Arc::clone(&self.gauge),
        );
        tracing::info!(%previous, current = %environment, "Environment set");
    }

    pub async fn get_connection(&self, db_name: &str) -> Result<ConnectionHandle<K::Connection>, DbError> {
        self.pool.read().await.get_connection(db_name).await
    }

    pub async fn get_cursor(&self, db_name: &str) -> Result<Cursor<K::Connection>, DbError> {
        self.pool.read().await.get_cursor(db_name).await
    }

    pub async fn close(&self, db_name: &str) {
        self.pool.read().await.close(db_name).await;
    }

    pub async fn close_all(&self) {
        self.pool.read().await.close_all().await;
    }

    /// Process teardown: close everything under the exclusive lock.
    pub async fn shutdown(&self) {
        let pool = self.write_when_idle().await;
        pool.close_all().await;
        tracing::debug!(environment = %pool.environment(), "Connection manager shut down");
    }

    pub async fn open_databases(&self) -> Vec<String> {
        self.pool.read().await.open_databases().await
    }

    /// Physical connections opened since the last environment switch.
    pub async fn connections_opened(&self) -> usize {
        self.pool.read().await.connections_opened()
    }

    /// Take the write lock once no cursor is outstanding.
    ///
    /// Cursors taken through the facade are counted while the read lock is
    /// held, so the count seen under the write lock can only fall.
    async fn write_when_idle(&self) -> RwLockWriteGuard<'_, ConnectionPool<K>> {
        loop {
            self.gauge.wait_idle().await;
            let pool = self.pool.write().await;
            if self.gauge.outstanding() == 0 {
                return pool;
            }
            drop(pool);
        }
    }
}
