use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tokio::sync::OnceCell;
use tracing::info;

use migration::MigratorTrait;
use models::config;

use crate::errors::StoreError;
use crate::store::backend::TabularBackend;
use crate::store::query::{any_of, BackendFilter};
use crate::store::reconcile::Reconciled;

const NAME: &str = "SeaOrmBackend";

// Keeps bind parameters per statement well below SQLite's limit.
const ROWS_PER_STATEMENT: usize = 100;
const IDS_PER_STATEMENT: usize = 500;

/// Relational backend over a SeaORM connection (PostgreSQL or SQLite).
pub struct SeaOrmBackend {
    config: Option<configs::DatabaseConfig>,
    synchronize: bool,
    db: OnceCell<DatabaseConnection>,
}

impl SeaOrmBackend {
    /// Unconnected backend; call [`initialize`](Self::initialize) before use.
    /// With `synchronize` the migrator runs right after connecting.
    pub fn new(config: configs::DatabaseConfig, synchronize: bool) -> Self {
        Self { config: Some(config), synchronize, db: OnceCell::new() }
    }

    /// Wrap an established connection. The `config` table must already exist.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { config: None, synchronize: false, db: OnceCell::new_with(Some(db)) }
    }

    /// Connect (and migrate when synchronizing). No-op once connected.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.db
            .get_or_try_init(|| async {
                let cfg = self.config.as_ref().ok_or_else(|| StoreError::initialize(NAME, "no database configuration"))?;
                let db = models::db::connect_with_config(cfg)
                    .await
                    .map_err(|e| StoreError::initialize(NAME, e))?;
                if self.synchronize {
                    migration::Migrator::up(&db, None)
                        .await
                        .map_err(|e| StoreError::initialize(NAME, e))?;
                    info!(event = "schema_synchronized", "config table migrations applied");
                }
                Ok::<_, StoreError>(db)
            })
            .await?;
        Ok(())
    }

    pub fn connection(&self) -> Option<&DatabaseConnection> { self.db.get() }

    fn db(&self) -> Result<&DatabaseConnection, StoreError> {
        self.db.get().ok_or_else(|| StoreError::not_initialized(NAME))
    }
}

fn write_err(e: DbErr) -> StoreError { StoreError::BackendWrite(e.to_string()) }

fn active(row: &config::Model) -> config::ActiveModel {
    config::ActiveModel {
        id: Set(row.id.clone()),
        set: Set(row.set.clone()),
        schema: Set(row.schema.clone()),
        key: Set(row.key.clone()),
        value: Set(row.value.clone()),
    }
}

async fn delete_rows<C: ConnectionTrait>(conn: &C, ids: &[String]) -> Result<(), DbErr> {
    for chunk in ids.chunks(IDS_PER_STATEMENT) {
        config::Entity::delete_many()
            .filter(config::Column::Id.is_in(chunk.iter().map(String::as_str)))
            .exec(conn)
            .await?;
    }
    Ok(())
}

async fn upsert_rows<C: ConnectionTrait>(conn: &C, rows: &[config::Model]) -> Result<(), DbErr> {
    for chunk in rows.chunks(ROWS_PER_STATEMENT) {
        config::Entity::insert_many(chunk.iter().map(active))
            .on_conflict(
                OnConflict::column(config::Column::Id)
                    .update_columns([
                        config::Column::Set,
                        config::Column::Schema,
                        config::Column::Key,
                        config::Column::Value,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl TabularBackend for SeaOrmBackend {
    fn protocol(&self) -> &'static str {
        match self.db.get().map(|db| db.get_database_backend()) {
            Some(DatabaseBackend::Postgres) => "postgres",
            Some(DatabaseBackend::Sqlite) => "sqlite",
            Some(_) => "mysql",
            None => match &self.config {
                Some(cfg) if cfg.url.starts_with("sqlite:") => "sqlite",
                _ => "postgres",
            },
        }
    }

    fn name(&self) -> &'static str { NAME }

    fn is_ready(&self) -> bool { self.db.initialized() }

    async fn find_by_filter(&self, filters: &[BackendFilter]) -> Result<Vec<config::Model>, StoreError> {
        let db = self.db()?;
        if filters.is_empty() {
            return Ok(Vec::new());
        }
        config::Entity::find()
            .filter(any_of(filters))
            .order_by_asc(config::Column::Set)
            .order_by_asc(config::Column::Schema)
            .order_by_asc(config::Column::Key)
            .all(db)
            .await
            .map_err(|e| StoreError::BackendRead(e.to_string()))
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        delete_rows(self.db()?, ids).await.map_err(write_err)
    }

    async fn upsert_by_ids(&self, rows: &[config::Model]) -> Result<(), StoreError> {
        upsert_rows(self.db()?, rows).await.map_err(write_err)
    }

    /// Deletes and upserts commit together in one transaction.
    async fn apply(&self, plan: &Reconciled) -> Result<(), StoreError> {
        let txn = self.db()?.begin().await.map_err(write_err)?;
        delete_rows(&txn, &plan.to_delete).await.map_err(write_err)?;
        upsert_rows(&txn, &plan.to_upsert).await.map_err(write_err)?;
        txn.commit().await.map_err(write_err)
    }
}
