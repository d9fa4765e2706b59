use super::AppState;
use super::payload::webhook_signature;
use super::router::ROUTES;
use super::schemas::{RouteNotFound, TransactionResponse, WebhookResponse};
use crate::error::ErrorKind;
use crate::models::BalanceChange;
use crate::solana::parser::extract_balance_change;
use actix_web::HttpResponse;
use actix_web::http::Method;
use serde_json::Value;
use tracing::{error, info, warn};

/// Ingest a webhook delivery: locate the signature, extract the balance
/// change and, when a store is attached, upsert it before answering.
pub async fn ingest_webhook(state: &AppState, body: &[u8]) -> crate::Result<HttpResponse> {
    let payload: Value = serde_json::from_slice(body)?;
    let signature = webhook_signature(&payload)
        .ok_or_else(|| {
            ErrorKind::InvalidInput("No transaction signature found in webhook payload".to_string())
        })?
        .to_string();

    info!(signature = %signature, "Webhook received");

    let change = live_balance_change(state, &signature).await?;

    if let Some(store) = &state.store {
        store.upsert(&change).await.map_err(|e| {
            error!(signature = %signature, "Failed to store balance change: {}", e);
            ErrorKind::DBError(format!("Failed to store transaction {}: {}", signature, e))
        })?;
    }

    info!(signature = %signature, delta = %change.delta, "Transaction processed");

    Ok(HttpResponse::Ok().json(WebhookResponse {
        message: "Transaction processed".to_string(),
        data: change,
    }))
}

/// Answer a query by signature. With a store attached, a stored record is
/// returned as-is; otherwise the ledger is queried live and the result is
/// written back so later queries are served from the store.
pub async fn transaction_by_signature(
    state: &AppState,
    signature: &str,
) -> crate::Result<HttpResponse> {
    let signature = signature.trim();
    if signature.is_empty() {
        return Err(ErrorKind::InvalidInput("Missing transaction signature".to_string()).into());
    }

    if let Some(store) = &state.store {
        if let Some(row) = store.find(signature).await? {
            info!(signature = %signature, "Served from database");
            return Ok(HttpResponse::Ok().json(TransactionResponse::from_stored(row)));
        }
    }

    let change = live_balance_change(state, signature).await?;

    if let Some(store) = &state.store {
        if let Err(e) = store.upsert(&change).await {
            warn!(signature = %signature, "Failed to write back live result: {}", e);
        }
    }

    Ok(HttpResponse::Ok().json(TransactionResponse::from_live(change)))
}

pub fn route_not_found(method: &Method, path: &str) -> HttpResponse {
    HttpResponse::NotFound().json(RouteNotFound {
        code: 404,
        message: format!("No route for {} {}", method, path),
        routes: ROUTES.iter().map(|r| r.to_string()).collect(),
    })
}

async fn live_balance_change(state: &AppState, signature: &str) -> crate::Result<BalanceChange> {
    let tx = state
        .fetcher
        .fetch_transaction(signature)
        .await
        .map_err(|e| {
            error!(signature = %signature, "Failed to fetch transaction: {}", e);
            e
        })?;

    extract_balance_change(tx.as_ref(), signature, &state.criteria).map_err(|reason| {
        warn!(signature = %signature, %reason, "No balance change extracted");
        ErrorKind::NotFound(format!(
            "Transaction {} not found or not applicable: {}",
            signature, reason
        ))
        .into()
    })
}
