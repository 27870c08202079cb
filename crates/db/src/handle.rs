//! Live connection handles and the scoped cursors taken from them.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use adminrun_core::environment::Environment;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, Notify, OwnedMappedMutexGuard, OwnedMutexGuard};
use uuid::Uuid;

use crate::connector::DbConnection;
use crate::error::DbError;

/// One open connection to one named database.
///
/// Cheap to clone; all clones refer to the same connection. The pool owns
/// the canonical copy and is the only place that closes it on teardown, but
/// callers holding a clone can observe [`is_live`](Self::is_live) and may
/// close it early.
pub struct ConnectionHandle<C> {
    inner: Arc<HandleInner<C>>,
}

struct HandleInner<C> {
    id: Uuid,
    db_name: String,
    environment: Environment,
    opened_at: DateTime<Utc>,
    closed: AtomicBool,
    conn: Arc<Mutex<Option<C>>>,
    gauge: Arc<CursorGauge>,
}

impl<C> Clone for ConnectionHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for ConnectionHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.inner.id)
            .field("db_name", &self.inner.db_name)
            .field("environment", &self.inner.environment)
            .field("live", &self.is_live())
            .finish()
    }
}

impl<C> ConnectionHandle<C> {
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn db_name(&self) -> &str {
        &self.inner.db_name
    }

    /// The environment whose credentials opened this connection.
    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.inner.opened_at
    }

    /// `false` once the handle has been closed, by the pool or otherwise.
    pub fn is_live(&self) -> bool {
        !self.inner.closed.load(Ordering::Acquire)
    }

    /// Whether both handles refer to the same physical connection.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<C: DbConnection> ConnectionHandle<C> {
    pub(crate) fn new(db_name: &str, environment: Environment, conn: C, gauge: Arc<CursorGauge>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id: Uuid::now_v7(),
                db_name: db_name.to_string(),
                environment,
                opened_at: Utc::now(),
                closed: AtomicBool::new(false),
                conn: Arc::new(Mutex::new(Some(conn))),
                gauge,
            }),
        }
    }

    /// Take exclusive use of the connection until the cursor is dropped.
    ///
    /// Waits while another cursor on the same handle is outstanding.
    pub async fn cursor(&self) -> Result<Cursor<C>, DbError> {
        let guard = Arc::clone(&self.inner.conn).lock_owned().await;
        OwnedMutexGuard::try_map(guard, |slot| slot.as_mut())
            .map(|guard| Cursor {
                db_name: self.inner.db_name.clone(),
                guard,
                _lease: CursorLease::acquire(&self.inner.gauge),
            })
            .map_err(|_| DbError::HandleClosed {
                db_name: self.inner.db_name.clone(),
            })
    }

    /// Close the connection, waiting for any outstanding cursor first.
    ///
    /// Returns `Ok(false)` if it was already closed.
    pub async fn close(&self) -> Result<bool, DbError> {
        let mut slot = self.inner.conn.lock().await;
        self.inner.closed.store(true, Ordering::Release);

        let Some(conn) = slot.take() else {
            return Ok(false);
        };
        conn.close().await.map_err(|source| DbError::Close {
            db_name: self.inner.db_name.clone(),
            source,
        })?;
        Ok(true)
    }
}

/// Exclusive, scoped access to a handle's connection. Dereferences to the
/// connection itself; released on drop.
pub struct Cursor<C> {
    db_name: String,
    // Dropped before the lease, so the connection is free once the gauge
    // reports idle.
    guard: OwnedMappedMutexGuard<Option<C>, C>,
    _lease: CursorLease,
}

impl<C> Cursor<C> {
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

impl<C> Deref for Cursor<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.guard
    }
}

impl<C> DerefMut for Cursor<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.guard
    }
}

impl<C> fmt::Debug for Cursor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("db_name", &self.db_name).finish()
    }
}

/// Number of cursors outstanding across every handle sharing the gauge.
#[derive(Debug, Default)]
pub(crate) struct CursorGauge {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl CursorGauge {
    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Resolve once no cursor is outstanding.
    pub(crate) async fn wait_idle(&self) {
        loop {
            let idle = self.idle.notified();
            if self.outstanding() == 0 {
                return;
            }
            idle.await;
        }
    }
}

struct CursorLease(Arc<CursorGauge>);

impl CursorLease {
    fn acquire(gauge: &Arc<CursorGauge>) -> Self {
        gauge.outstanding.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(gauge))
    }
}

impl Drop for CursorLease {
    fn drop(&mut self) {
        if self.0.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}
