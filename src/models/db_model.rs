use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use super::BalanceChange;

/// Row of the `balance_changes` table, one per transaction signature.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct StoredBalanceChange {
    pub signature: String,
    pub pre_amount: Decimal,
    pub post_amount: Decimal,
    pub delta: Decimal,
    pub tx_timestamp: Option<DateTime<Utc>>,
    pub processed_at: DateTime<Utc>,
}

impl StoredBalanceChange {
    pub fn into_balance_change(self) -> BalanceChange {
        BalanceChange {
            signature: self.signature,
            pre_amount: self.pre_amount,
            post_amount: self.post_amount,
            delta: self.delta,
            timestamp: self.tx_timestamp,
        }
    }
}
