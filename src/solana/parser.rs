use crate::models::{
    AssetSelector, BalanceChange, NotApplicable, TokenBalance, TransactionMeta,
    TransactionResult, UiTokenAmount, WatchCriteria,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal places of a lamport amount.
const LAMPORT_DECIMALS: u32 = 9;
/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Compute the net balance change of the watched (address, asset) pair.
///
/// Pure and deterministic: identical inputs always produce identical output,
/// which keeps duplicate webhook deliveries idempotent.
pub fn extract_balance_change(
    tx: Option<&TransactionResult>,
    signature: &str,
    criteria: &WatchCriteria,
) -> Result<BalanceChange, NotApplicable> {
    let tx = tx.ok_or(NotApplicable::MissingTransaction)?;
    let meta = tx.meta.as_ref().ok_or(NotApplicable::MissingMeta)?;
    let address = criteria
        .address
        .as_deref()
        .ok_or(NotApplicable::UnsetAddress)?;
    let asset = criteria.asset.as_ref().ok_or(NotApplicable::UnsetAsset)?;

    let (pre_amount, post_amount) = match asset {
        AssetSelector::Native => native_amounts(tx, meta, address),
        AssetSelector::Mint(mint) => token_amounts(meta, address, mint),
    };

    Ok(BalanceChange::new(
        signature.to_string(),
        pre_amount,
        post_amount,
        block_timestamp(tx.block_time),
    ))
}

/// Lamport balances of `address` in SOL. An address absent from the
/// transaction has zero on both sides.
fn native_amounts(
    tx: &TransactionResult,
    meta: &TransactionMeta,
    address: &str,
) -> (Decimal, Decimal) {
    let Some(idx) = tx.account_keys().position(|k| k == address) else {
        return (Decimal::ZERO, Decimal::ZERO);
    };

    let pre = meta.pre_balances.get(idx).copied().unwrap_or(0);
    let post = meta.post_balances.get(idx).copied().unwrap_or(0);

    (lamports_to_sol(pre), lamports_to_sol(post))
}

/// Token balances owned by `owner` for `mint`. Pre and post are scanned
/// independently because the token account may be created or closed by the
/// transaction itself.
fn token_amounts(meta: &TransactionMeta, owner: &str, mint: &str) -> (Decimal, Decimal) {
    let find = |balances: &Option<Vec<TokenBalance>>| {
        balances
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|b| b.mint == mint && b.owner.as_deref() == Some(owner))
            .map(|b| ui_amount(&b.ui_token_amount))
            .unwrap_or(Decimal::ZERO)
    };

    (find(&meta.pre_token_balances), find(&meta.post_token_balances))
}

pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(lamports), LAMPORT_DECIMALS).normalize()
}

/// Human-readable token amount. Falls back to the raw integer amount scaled by
/// its decimals, then to zero; never fails.
fn ui_amount(amount: &UiTokenAmount) -> Decimal {
    amount
        .ui_amount_string
        .as_deref()
        .and_then(parse_decimal)
        .or_else(|| raw_amount(amount))
        .unwrap_or(Decimal::ZERO)
}

fn raw_amount(amount: &UiTokenAmount) -> Option<Decimal> {
    let raw: u64 = amount.amount.as_deref()?.trim().parse().ok()?;
    let decimals = amount.decimals?;
    if decimals > MAX_DECIMAL_SCALE {
        return None;
    }
    Some(Decimal::from_i128_with_scale(i128::from(raw), decimals).normalize())
}

/// Balances are never negative; a signed amount is malformed.
fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
        .filter(|d| !d.is_sign_negative())
}

fn block_timestamp(block_time: Option<i64>) -> Option<DateTime<Utc>> {
    block_time.and_then(|ts| DateTime::from_timestamp(ts, 0))
}
