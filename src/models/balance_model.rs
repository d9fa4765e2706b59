use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const NATIVE_SENTINEL: &str = "SOL";

/// Which balance a watched address is tracked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSelector {
    /// Lamport balance of the address itself.
    Native,
    /// SPL token balance owned by the address, keyed by mint.
    Mint(String),
}

impl AssetSelector {
    /// `None` for an empty value, `Native` for a case-insensitive `SOL`, otherwise a mint.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value.eq_ignore_ascii_case(NATIVE_SENTINEL) {
            Some(AssetSelector::Native)
        } else {
            Some(AssetSelector::Mint(value.to_string()))
        }
    }
}

impl std::fmt::Display for AssetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetSelector::Native => f.write_str(NATIVE_SENTINEL),
            AssetSelector::Mint(mint) => f.write_str(mint),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchCriteria {
    pub address: Option<String>,
    pub asset: Option<AssetSelector>,
}

impl WatchCriteria {
    pub fn new(address: Option<&str>, asset: Option<&str>) -> Self {
        Self {
            address: address
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            asset: asset.and_then(AssetSelector::parse),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.address.is_some() && self.asset.is_some()
    }
}

/// Net balance change of the watched (address, asset) pair in one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    pub signature: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub pre_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub post_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delta: Decimal,
    pub timestamp: Option<DateTime<Utc>>,
}

impl BalanceChange {
    pub fn new(
        signature: String,
        pre_amount: Decimal,
        post_amount: Decimal,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            signature,
            pre_amount,
            post_amount,
            delta: post_amount - pre_amount,
            timestamp,
        }
    }
}

/// Why a transaction yields no balance change for the watch criteria.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotApplicable {
    #[error("transaction not found or not yet confirmed")]
    MissingTransaction,
    #[error("transaction has no metadata")]
    MissingMeta,
    #[error("watched address is not configured")]
    UnsetAddress,
    #[error("watched asset is not configured")]
    UnsetAsset,
}
