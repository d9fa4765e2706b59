use crate::models::{BalanceChange, StoredBalanceChange};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub message: String,
    pub data: BalanceChange,
}

/// Where a query result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Database,
    Rpc,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub signature: String,
    /// Net balance change of the watched asset.
    #[serde(with = "rust_decimal::serde::float")]
    pub token_transfers: Decimal,
    pub timestamp: Option<DateTime<Utc>>,
    pub source: Source,
}

impl TransactionResponse {
    pub fn from_live(change: BalanceChange) -> Self {
        Self {
            signature: change.signature,
            token_transfers: change.delta,
            timestamp: change.timestamp,
            source: Source::Rpc,
        }
    }

    pub fn from_stored(row: StoredBalanceChange) -> Self {
        Self {
            source: Source::Database,
            ..Self::from_live(row.into_balance_change())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteNotFound {
    pub code: u16,
    pub message: String,
    pub routes: Vec<String>,
}
