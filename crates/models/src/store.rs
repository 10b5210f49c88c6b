use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, QueryResult, Statement,
    TransactionTrait, Value,
};
use tracing::{info, instrument};

use crate::{db, errors::ModelError, seed};

/// Owner of the content database handle.
///
/// Built once at startup and handed to the repository layer; clones share
/// the same pool.
#[derive(Clone, Debug)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    /// Connect using `cfg`. Fails when the database file cannot be opened or created.
    pub async fn open(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let db = db::connect_with_config(cfg).await?;
        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn begin(&self) -> Result<DatabaseTransaction, ModelError> {
        Ok(self.db.begin().await?)
    }

    /// Create the content tables when absent. Safe to call on every start.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), ModelError> {
        migration::Migrator::up(&self.db, None).await?;
        info!(event = "schema_ready", "content tables ready");
        Ok(())
    }

    /// Insert the default corpus when `content_blocks` is empty. Returns
    /// whether anything was written.
    #[instrument(skip(self))]
    pub async fn seed_if_empty(&self) -> Result<bool, ModelError> {
        let count = self
            .fetch_one("SELECT COUNT(*) AS count FROM content_blocks", [])
            .await?
            .map(|row| row.try_get::<i64>("", "count"))
            .transpose()?
            .unwrap_or(0);
        if count > 0 {
            return Ok(false);
        }

        let txn = self.db.begin().await?;
        if let Err(e) = seed::insert_defaults(&txn).await {
            txn.rollback().await?;
            return Err(e.into());
        }
        txn.commit().await?;
        info!(
            event = "seeded",
            blocks = seed::BLOCKS.len(),
            services = seed::SERVICES.len(),
            settings = seed::SETTINGS.len(),
            "default content inserted"
        );
        Ok(true)
    }

    /// Run a parameterized statement and return the affected row count.
    pub async fn execute<I>(&self, sql: &str, values: I) -> Result<u64, ModelError>
    where
        I: IntoIterator<Item = Value>,
    {
        let res = self.db.execute(self.statement(sql, values)).await?;
        Ok(res.rows_affected())
    }

    pub async fn fetch_one<I>(&self, sql: &str, values: I) -> Result<Option<QueryResult>, ModelError>
    where
        I: IntoIterator<Item = Value>,
    {
        Ok(self.db.query_one(self.statement(sql, values)).await?)
    }

    pub async fn fetch_all<I>(&self, sql: &str, values: I) -> Result<Vec<QueryResult>, ModelError>
    where
        I: IntoIterator<Item = Value>,
    {
        Ok(self.db.query_all(self.statement(sql, values)).await?)
    }

    fn statement<I>(&self, sql: &str, values: I) -> Statement
    where
        I: IntoIterator<Item = Value>,
    {
        Statement::from_sql_and_values(self.db.get_database_backend(), sql, values)
    }
}
