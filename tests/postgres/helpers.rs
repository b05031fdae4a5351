//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use diesel::prelude::*;
use memechat::chat::adapters::postgres::PostgresChatRepository;
use rstest::fixture;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Builds the single-threaded runtime the synchronous tests block on.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// A migrated database of its own, dropped when the context goes away.
pub struct PgContext {
    pub cluster: PostgresCluster,
    pub db_name: String,
    pub repo: PostgresChatRepository,
    pub rt: Runtime,
}

impl PgContext {
    fn new(cluster: PostgresCluster) -> Result<Self, BoxError> {
        let db_name = format!("test_{}", Uuid::new_v4().simple());
        cluster.create_database(&db_name)?;
        let rt = test_runtime()?;
        let url = cluster.database_url(&db_name);
        let connected = rt.block_on(async {
            let store = PostgresChatRepository::connect(&url, 2).await?;
            store.run_migrations().await?;
            Ok::<_, memechat::chat::error::RepositoryError>(store)
        });
        match connected {
            Ok(repo) => Ok(Self {
                cluster,
                db_name,
                repo,
                rt,
            }),
            Err(err) => {
                cluster.drop_database(&db_name)?;
                Err(Box::new(err))
            }
        }
    }

    /// Opens a direct connection to this context's database.
    pub fn connection(&self) -> PgConnection {
        PgConnection::establish(&self.cluster.database_url(&self.db_name))
            .expect("direct database connection")
    }
}

impl Drop for PgContext {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.db_name));
    }
}

/// Provides a fresh migrated database, or `None` when the cluster is
/// unavailable and the test should be skipped.
#[fixture]
pub fn pg_context(postgres_cluster: Option<PostgresCluster>) -> Option<PgContext> {
    let cluster = postgres_cluster?;
    Some(PgContext::new(cluster).expect("test database setup"))
}
