pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod solana;

pub type Result<T> = std::result::Result<T, error::Error>;

/// Install the global `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
