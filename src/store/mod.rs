//! Storefront Storage
//! SQLite-backed persistence for users, catalog, and orders
//!
//! One connection is shared behind a mutex and driven from the blocking pool.
//! Every call is cancellation-aware: when the awaiting future is dropped
//! (client gone, request timed out) a pending call is skipped and a running
//! statement is interrupted, so the connection is released promptly.
//! Transactional calls also re-check before commit, since SQLite forgets an
//! interrupt that lands between two statements.

mod categories;
mod items;
mod orders;
mod users;

use parking_lot::Mutex; // Faster than std::sync::Mutex
use rusqlite::{ffi, Connection, ErrorCode, InterruptHandle, Transaction};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    login TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price INTEGER NOT NULL,
    category INTEGER REFERENCES categories(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_items_category ON items(category);

CREATE TABLE IF NOT EXISTS statuses (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL
);

INSERT OR IGNORE INTO statuses (id, title) VALUES (1, 'in progress'), (2, 'ready');

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    status INTEGER NOT NULL REFERENCES statuses(id),
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id);

-- item carries no foreign key: deleting an item leaves order history alone
CREATE TABLE IF NOT EXISTS order_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    item INTEGER NOT NULL,
    amount INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id);

CREATE TABLE IF NOT EXISTS cart_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    item INTEGER NOT NULL,
    amount INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cart_items_user ON cart_items(user_id);
"#;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("store call cancelled")]
    Cancelled,
    #[error("database error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::OperationInterrupted => {
                StoreError::Cancelled
            }
            rusqlite::Error::SqliteFailure(e, msg)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                StoreError::InvalidReference(
                    msg.clone()
                        .unwrap_or_else(|| "foreign key constraint failed".to_string()),
                )
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Lifecycle of a single store call, shared between the caller and the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallState {
    Pending,
    Running,
    Finished,
    Cancelled,
}

/// Interrupts the call it guards if dropped before the call completes
struct CancelGuard {
    op: &'static str,
    state: Arc<Mutex<CallState>>,
    interrupt: Arc<InterruptHandle>,
    armed: bool,
}

impl CancelGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        match *state {
            CallState::Pending => {
                *state = CallState::Cancelled;
                debug!(op = self.op, "store call cancelled before start");
            }
            CallState::Running => {
                *state = CallState::Cancelled;
                self.interrupt.interrupt();
                debug!(op = self.op, "store call interrupted");
            }
            CallState::Finished | CallState::Cancelled => {}
        }
    }
}

/// Storefront storage with SQLite backend
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    interrupt: Arc<InterruptHandle>,
}

impl Store {
    /// Open (or create) the database at `db_path` and apply the schema
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        let store = Self::init(conn)?;
        info!("🗄️  Storefront database initialized at: {}", db_path);
        Ok(store)
    }

    /// Private in-memory database, used by tests
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA_SQL)?;

        let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        if foreign_keys != 1 {
            warn!("foreign key enforcement unavailable, cascades will not apply");
        }

        let interrupt = Arc::new(conn.get_interrupt_handle());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        })
    }

    /// Run `f` against the connection on the blocking pool.
    ///
    /// Dropping the returned future cancels the call: it either never starts
    /// or has its running statement interrupted.
    pub(crate) async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        self.dispatch(op, move |conn, _| f(conn)).await
    }

    /// Run `f` inside a transaction that commits only if the caller is still
    /// waiting. A cancelled call rolls back and reports `Cancelled`.
    pub(crate) async fn run_in_transaction<T, F>(
        &self,
        op: &'static str,
        f: F,
    ) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> Result<T, StoreError> + Send + 'static,
    {
        self.dispatch(op, move |conn, state| {
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            if *state.lock() == CallState::Cancelled {
                return Err(StoreError::Cancelled);
            }
            tx.commit()?;
            Ok(value)
        })
        .await
    }

    async fn dispatch<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &Mutex<CallState>) -> Result<T, StoreError> + Send + 'static,
    {
        let state = Arc::new(Mutex::new(CallState::Pending));
        let mut guard = CancelGuard {
            op,
            state: Arc::clone(&state),
            interrupt: Arc::clone(&self.interrupt),
            armed: true,
        };

        let conn = Arc::clone(&self.conn);
        let handle = tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            {
                let mut s = state.lock();
                if *s == CallState::Cancelled {
                    return Err(StoreError::Cancelled);
                }
                *s = CallState::Running;
            }

            let result = f(&mut *conn, &*state);
            {
                let mut s = state.lock();
                if *s == CallState::Running {
                    *s = CallState::Finished;
                }
            }

            if let Err(StoreError::Cancelled) = &result {
                debug!(op, "store call aborted after cancellation");
            }
            result
        });

        let result = handle.await;
        guard.disarm();
        result?
    }
}
