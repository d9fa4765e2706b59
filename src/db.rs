use crate::error::StoreError;
use crate::models::{self, BalanceChange, StoredBalanceChange};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Creates a lazily connecting pool to the Postgres database
pub fn get_db_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy(database_url)
        .context("Failed to parse DATABASE_URL")
}

/// Durable record of processed balance changes, keyed by signature.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Insert or overwrite the record for `change.signature`.
    async fn upsert(&self, change: &BalanceChange) -> Result<(), StoreError>;

    async fn find(&self, signature: &str) -> Result<Option<StoredBalanceChange>, StoreError>;
}

/// Postgres-backed store. Built without a pool when persistence is not
/// configured, in which case every operation fails with `NotConfigured`.
pub struct PgBalanceStore {
    pool: Option<PgPool>,
}

impl PgBalanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn unconfigured() -> Self {
        Self { pool: None }
    }

    pub async fn initialize(&self) -> Result<(), StoreError> {
        models::create_schema(self.pool()?)
            .await
            .map_err(database_error)?;
        info!("balance_changes table ready");
        Ok(())
    }

    fn pool(&self) -> Result<&PgPool, StoreError> {
        self.pool
            .as_ref()
            .ok_or_else(|| StoreError::NotConfigured("DATABASE_URL is not set".to_string()))
    }
}

#[async_trait]
impl BalanceStore for PgBalanceStore {
    async fn upsert(&self, change: &BalanceChange) -> Result<(), StoreError> {
        models::upsert_balance_change(self.pool()?, change)
            .await
            .map_err(database_error)
    }

    async fn find(&self, signature: &str) -> Result<Option<StoredBalanceChange>, StoreError> {
        models::get_balance_change(self.pool()?, signature)
            .await
            .map_err(database_error)
    }
}

fn database_error(err: anyhow::Error) -> StoreError {
    StoreError::Database(format!("{:#}", err))
}
