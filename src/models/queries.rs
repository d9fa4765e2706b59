use super::{BalanceChange, StoredBalanceChange};
use anyhow::{Context, Result};
use sqlx::PgPool;

// ==========================================
// SCHEMA
// ==========================================

const CREATE_BALANCE_CHANGES: &str = r#"
    CREATE TABLE IF NOT EXISTS balance_changes (
        signature    TEXT PRIMARY KEY,
        pre_amount   NUMERIC NOT NULL,
        post_amount  NUMERIC NOT NULL,
        delta        NUMERIC NOT NULL,
        tx_timestamp TIMESTAMPTZ,
        processed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

/// Create the `balance_changes` table if it does not exist yet
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_BALANCE_CHANGES)
        .execute(pool)
        .await
        .context("Failed to create balance_changes table")?;

    Ok(())
}

// ==========================================
// BALANCE CHANGE OPERATIONS
// ==========================================

/// Insert or overwrite the balance change for a signature (last write wins)
pub async fn upsert_balance_change(pool: &PgPool, change: &BalanceChange) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO balance_changes (
            signature, pre_amount, post_amount, delta, tx_timestamp, processed_at
        ) VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT (signature)
        DO UPDATE SET
            pre_amount = EXCLUDED.pre_amount,
            post_amount = EXCLUDED.post_amount,
            delta = EXCLUDED.delta,
            tx_timestamp = EXCLUDED.tx_timestamp,
            processed_at = NOW()
        "#,
    )
    .bind(&change.signature)
    .bind(change.pre_amount)
    .bind(change.post_amount)
    .bind(change.delta)
    .bind(change.timestamp)
    .execute(pool)
    .await
    .context("Failed to upsert balance change")?;

    Ok(())
}

/// Get the stored balance change for a signature
pub async fn get_balance_change(
    pool: &PgPool,
    signature: &str,
) -> Result<Option<StoredBalanceChange>> {
    let row = sqlx::query_as::<_, StoredBalanceChange>(
        r#"
        SELECT
            signature,
            pre_amount,
            post_amount,
            delta,
            tx_timestamp,
            processed_at
        FROM balance_changes
        WHERE signature = $1
        "#,
    )
    .bind(signature)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch balance change")?;

    Ok(row)
}
