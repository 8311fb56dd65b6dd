//! Write transactions that take SQLite's write lock up front.

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// A `BEGIN IMMEDIATE` transaction on a pooled connection.
///
/// A deferred `BEGIN` that reads before writing can fail its lock upgrade with
/// `SQLITE_BUSY` when another writer commits in between; `busy_timeout` does not
/// cover that case. Taking the lock at `BEGIN` makes concurrent writers queue on
/// `busy_timeout` instead.
///
/// Dropping without [`WriteTransaction::commit`] closes the connection, which
/// rolls the transaction back.
pub(crate) struct WriteTransaction {
    conn: Option<PoolConnection<Sqlite>>,
}

impl WriteTransaction {
    pub(crate) async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(WriteTransaction { conn: Some(conn) })
    }

    pub(crate) async fn commit(mut self) -> Result<(), sqlx::Error> {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
                // Never hand a connection with an open transaction back to the pool.
                drop(conn.detach());
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Deref for WriteTransaction {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        self.conn
            .as_deref()
            .expect("connection is present until commit consumes the transaction")
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        self.conn
            .as_deref_mut()
            .expect("connection is present until commit consumes the transaction")
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            debug!("Write transaction dropped without commit, rolling back");
            drop(conn.detach());
        }
    }
}
