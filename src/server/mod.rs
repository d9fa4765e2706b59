pub mod handlers;
pub mod payload;
pub mod router;
pub mod schemas;

use crate::config::{Config, LimitsConfig};
use crate::db::BalanceStore;
use crate::error::{Error, ErrorKind};
use crate::models::WatchCriteria;
use crate::solana::fetcher::{RpcTransactionFetcher, TransactionFetcher};
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, ResponseError, middleware, web};
use anyhow::{Context, Result};
use futures_util::FutureExt;
use router::{Route, Router};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Handles shared by every request. Built once at startup and never mutated.
pub struct AppState {
    pub fetcher: Arc<dyn TransactionFetcher>,
    pub store: Option<Arc<dyn BalanceStore>>,
    pub criteria: WatchCriteria,
    pub router: Router,
}

impl AppState {
    pub fn new(
        fetcher: Arc<dyn TransactionFetcher>,
        store: Option<Arc<dyn BalanceStore>>,
        criteria: WatchCriteria,
        router: Router,
    ) -> Self {
        Self {
            fetcher,
            store,
            criteria,
            router,
        }
    }

    /// State backed by the configured RPC endpoint.
    pub fn from_config(config: &Config, store: Option<Arc<dyn BalanceStore>>) -> Result<Self> {
        let fetcher = RpcTransactionFetcher::new(config.rpc_url.clone(), config.rpc_timeout)
            .context("Failed to build RPC client")?;

        match (&config.watch.address, &config.watch.asset) {
            (Some(address), Some(asset)) => info!(%address, %asset, "Watching balance"),
            _ => warn!(
                "SOLANA_ADDRESS or TOKEN_MINT is not set; \
                 every transaction will be reported as not applicable"
            ),
        }

        Ok(Self::new(
            Arc::new(fetcher),
            store,
            config.watch.clone(),
            Router::new(config.function_name.as_deref()),
        ))
    }
}

/// Register the catch-all dispatcher. Routing is done by [`Router`] so the
/// service answers under whatever base path it is mounted at.
pub fn configure(
    state: web::Data<AppState>,
    limits: &LimitsConfig,
) -> impl FnOnce(&mut web::ServiceConfig) + use<> {
    let payload_limit = limits.input_payload_max_size;

    move |cfg| {
        cfg.app_data(state)
            .app_data(web::PayloadConfig::new(payload_limit))
            .default_service(web::to(dispatch));
    }
}

async fn dispatch(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let result = match AssertUnwindSafe(handle(&req, &body, &state))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => {
            error!(
                method = %req.method(),
                path = req.path(),
                "Handler panicked: {}",
                panic_message(panic.as_ref())
            );
            Err(ErrorKind::InternalError("Unexpected error".to_string()).into())
        }
    };

    result.unwrap_or_else(|err: Error| err.error_response())
}

async fn handle(req: &HttpRequest, body: &[u8], state: &AppState) -> crate::Result<HttpResponse> {
    match state.router.resolve(req.method(), req.path()) {
        Route::Preflight => Ok(HttpResponse::NoContent().finish()),
        Route::Webhook => handlers::ingest_webhook(state, body).await,
        Route::Transaction(signature) => {
            handlers::transaction_by_signature(state, &signature).await
        }
        Route::NotFound => Ok(handlers::route_not_found(req.method(), req.path())),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Permissive CORS headers for every response, including extractor rejections
/// that never reach the dispatcher.
pub fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"))
}

pub async fn run(config: &Config, state: AppState) -> Result<()> {
    let state = web::Data::new(state);
    let limits = config.limits.clone();

    info!("Listening on {}", config.addr);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(middleware::Logger::default())
            .configure(configure(state.clone(), &limits))
    })
    .bind(config.addr.as_str())
    .with_context(|| format!("Failed to bind {}", config.addr))?
    .run()
    .await
    .context("HTTP server failed")
}
