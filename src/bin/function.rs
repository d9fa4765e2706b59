use balance_tracker::config::Config;
use balance_tracker::db::{self, BalanceStore, PgBalanceStore};
use balance_tracker::server::{self, AppState};
use std::sync::Arc;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    balance_tracker::init_tracing();

    println!("🗄️  Starting Balance Tracker - Persistent Function");
    println!("==================================================\n");

    let store = match config.database_url.as_deref() {
        Some(url) => {
            let store = PgBalanceStore::new(db::get_db_pool(url)?);
            if let Err(e) = store.initialize().await {
                error!("Failed to prepare balance_changes table: {}", e);
            }
            store
        }
        None => {
            warn!("DATABASE_URL is not set; persistence operations will fail");
            PgBalanceStore::unconfigured()
        }
    };

    let store: Arc<dyn BalanceStore> = Arc::new(store);
    let state = AppState::from_config(&config, Some(store))?;
    server::run(&config, state).await
}
