use balance_tracker::config::Config;
use balance_tracker::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    balance_tracker::init_tracing();

    println!("🚀 Starting Balance Tracker - Webhook Server");
    println!("============================================\n");

    let state = AppState::from_config(&config, None)?;
    server::run(&config, state).await
}
