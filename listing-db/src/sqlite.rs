//! SQLite backend: a small round-robin pool of mutex-guarded connections,
//! plus the listing and introspection handlers for this engine.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use listing_core::{Dialect, ProductRecord, QueryFragment, SqlValue};
use rusqlite::types::Value;
use rusqlite::{Connection, InterruptHandle, params_from_iter};

use crate::error::StoreError;

struct Slot {
    conn: Mutex<Connection>,
    interrupt: InterruptHandle,
}

/// Pool of SQLite connections to one database.
///
/// Work runs on tokio's blocking thread pool. Connections are handed out
/// round-robin; each is guarded by its own mutex so at most one statement
/// runs on a connection at a time.
#[derive(Clone)]
pub struct SqlitePool {
    slots: Arc<Vec<Slot>>,
    cursor: Arc<AtomicUsize>,
}

impl SqlitePool {
    /// Open `size` connections to the database file at `path`.
    ///
    /// Every connection enables foreign key enforcement before it is used.
    pub fn open(path: &Path, size: usize) -> Result<Self, StoreError> {
        let size = size.max(1);
        let mut slots = Vec::with_capacity(size);
        for _ in 0..size {
            slots.push(Self::slot(Connection::open(path)?)?);
        }
        log::debug!("Opened {} SQLite connection(s) to {}", size, path.display());
        Ok(Self::from_slots(slots))
    }

    /// Open a single in-memory connection. Useful for testing.
    pub fn open_memory() -> Result<Self, StoreError> {
        let slot = Self::slot(Connection::open_in_memory()?)?;
        Ok(Self::from_slots(vec![slot]))
    }

    fn slot(conn: Connection) -> Result<Slot, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let interrupt = conn.get_interrupt_handle();
        Ok(Slot {
            conn: Mutex::new(conn),
            interrupt,
        })
    }

    fn from_slots(slots: Vec<Slot>) -> Self {
        Self {
            slots: Arc::new(slots),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Run `f` against the next connection on the blocking thread pool.
    ///
    /// When `timeout` elapses first, [`StoreError::Timeout`] is returned. If
    /// `f` is already running it is interrupted; if it is still waiting for
    /// the connection it is skipped. A statement belonging to another caller
    /// is never interrupted.
    pub async fn run<T, F>(&self, timeout: Option<Duration>, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        let slots = Arc::clone(&self.slots);
        let phase = Arc::new(Mutex::new(Phase::Waiting));
        let task_phase = Arc::clone(&phase);
        let task = tokio::task::spawn_blocking(move || {
            let conn = slots[index].conn.lock().map_err(|_| StoreError::Poisoned)?;
            {
                let mut phase = task_phase.lock().map_err(|_| StoreError::Poisoned)?;
                if *phase == Phase::Cancelled {
                    return Err(StoreError::Cancelled);
                }
                *phase = Phase::Running;
            }
            let result = f(&conn);
            // Flip to Done while the connection is still held, so a late
            // interrupt cannot land on the next caller's statement.
            if let Ok(mut phase) = task_phase.lock() {
                *phase = Phase::Done;
            }
            drop(conn);
            result
        });

        let joined = match timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    self.cancel(index, &phase);
                    log::warn!("SQLite statement exceeded {limit:?}");
                    return Err(StoreError::Timeout(limit));
                }
            },
            None => task.await,
        };
        joined.map_err(|e| StoreError::task(e.to_string()))?
    }

    fn cancel(&self, index: usize, phase: &Mutex<Phase>) {
        let Ok(mut phase) = phase.lock() else {
            return;
        };
        match *phase {
            Phase::Waiting => *phase = Phase::Cancelled,
            Phase::Running => {
                // The phase lock keeps the task from finishing and releasing
                // the connection until the interrupt is delivered.
                self.slots[index].interrupt.interrupt();
                log::debug!("Interrupted statement on SQLite connection {}", index);
            }
            Phase::Cancelled | Phase::Done => {}
        }
    }
}

/// Progress of one [`SqlitePool::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Running,
    Cancelled,
    Done,
}

/// Execute a listing statement and decode every row.
///
/// A row that fails to decode fails the whole call.
pub(crate) fn fetch_products(
    conn: &Connection,
    fragment: &QueryFragment,
) -> Result<Vec<ProductRecord>, StoreError> {
    let mut stmt = conn.prepare(&fragment.sql())?;
    let args = fragment.args().iter().map(to_value);
    let rows = stmt.query_map(params_from_iter(args), row_to_product)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(Dialect::Sqlite.table_exists_sql(), [table], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

pub(crate) fn count_rows(conn: &Connection, sql: &str) -> Result<i64, StoreError> {
    Ok(conn.query_row(sql, [], |row| row.get(0))?)
}

fn to_value(arg: &SqlValue) -> Value {
    match arg {
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Int(i) => Value::Integer(*i),
    }
}

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductRecord> {
    Ok(ProductRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        price: row.get(3)?,
    })
}
