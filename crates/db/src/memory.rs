//! A server-less [`Connector`] that records what it is asked to do.
//!
//! Each opened [`MemoryConnection`] gets a fresh session id, the stand-in for
//! a Postgres backend pid. Used by the test suites of this crate and of the
//! dispatcher.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::connector::{Connector, DbConnection};
use crate::credentials::ConnectionParams;
use crate::error::DbError;

/// One open/close event, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened {
        db_name: String,
        session_id: u64,
        /// The `host` parameter the connection was opened with.
        host: Option<String>,
    },
    Closed {
        db_name: String,
        session_id: u64,
    },
}

#[derive(Debug, Default)]
struct MemoryState {
    next_session: u64,
    events: Vec<ConnectionEvent>,
    refused: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make connection attempts for `db_name` fail until [`allow`](Self::allow)
    /// is called.
    pub fn refuse(&self, db_name: &str) {
        self.lock().refused.insert(db_name.to_string());
    }

    pub fn allow(&self, db_name: &str) {
        self.lock().refused.remove(db_name);
    }

    pub fn events(&self) -> Vec<ConnectionEvent> {
        self.lock().events.clone()
    }

    /// Number of physical connections opened so far.
    pub fn opened_count(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, ConnectionEvent::Opened { .. }))
            .count()
    }

    /// Number of physical connections currently open.
    pub fn open_count(&self) -> usize {
        let closed = self
            .lock()
            .events
            .iter()
            .filter(|e| matches!(e, ConnectionEvent::Closed { .. }))
            .count();
        self.opened_count() - closed
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryConnection;

    async fn connect(&self, db_name: &str, params: &ConnectionParams) -> Result<MemoryConnection, DbError> {
        let mut state = self.lock();
        if state.refused.contains(db_name) {
            return Err(DbError::Connect {
                db_name: db_name.to_string(),
                source: sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            });
        }

        state.next_session += 1;
        let session_id = state.next_session;
        state.events.push(ConnectionEvent::Opened {
            db_name: db_name.to_string(),
            session_id,
            host: params.get("host").map(str::to_string),
        });

        Ok(MemoryConnection {
            db_name: db_name.to_string(),
            session_id,
            params: params.clone(),
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub struct MemoryConnection {
    db_name: String,
    session_id: u64,
    params: ConnectionParams,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnection {
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }
}

impl DbConnection for MemoryConnection {
    async fn close(self) -> Result<(), sqlx::Error> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .push(ConnectionEvent::Closed {
                db_name: self.db_name,
                session_id: self.session_id,
            });
        Ok(())
    }
}
