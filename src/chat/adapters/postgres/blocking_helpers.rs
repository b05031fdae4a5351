//! Blocking operation helpers for the `PostgreSQL` repository.
//!
//! Diesel is synchronous, so every query runs on tokio's blocking pool.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use crate::chat::{error::RepositoryError, ports::RepositoryResult};

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub(super) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Runs a Diesel closure on the blocking pool and flattens the join error.
pub(super) async fn run_blocking<F, T>(f: F) -> RepositoryResult<T>
where
    F: FnOnce() -> RepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RepositoryError::connection(format!("blocking query task failed: {e}")))?
}

/// Checks a connection out of the pool.
pub(super) fn get_conn(pool: &PgPool) -> RepositoryResult<PooledConn> {
    pool.get()
        .map_err(|e| RepositoryError::connection(format!("no pooled connection: {e}")))
}
