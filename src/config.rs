use crate::models::WatchCriteria;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: String,
    pub rpc_url: String,
    pub rpc_timeout: Duration,
    pub watch: WatchCriteria,
    pub database_url: Option<String>,
    pub function_name: Option<String>,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub input_payload_max_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            input_payload_max_size: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Read configuration from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = var("SOLANA_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Url::parse(&rpc_url)
            .with_context(|| format!("SOLANA_RPC_URL is not a valid URL: {}", rpc_url))?;

        let rpc_timeout = match var("RPC_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("RPC_TIMEOUT_SECS must be a number of seconds: {}", v))?,
            None => DEFAULT_RPC_TIMEOUT_SECS,
        };

        let port: u16 = match var("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number: {}", v))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            addr: format!("0.0.0.0:{}", port),
            rpc_url,
            rpc_timeout: Duration::from_secs(rpc_timeout),
            watch: WatchCriteria::new(
                var("SOLANA_ADDRESS").as_deref(),
                var("TOKEN_MINT").as_deref(),
            ),
            database_url: var("DATABASE_URL"),
            function_name: var("FUNCTION_NAME")
                .map(|v| v.trim().trim_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            limits: LimitsConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetSelector;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.addr, "0.0.0.0:3000");
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
        assert!(!config.watch.is_complete());
        assert!(config.database_url.is_none());
        assert!(config.function_name.is_none());
    }

    #[test]
    fn reads_watch_criteria_and_overrides() {
        let config = config(&[
            ("SOLANA_RPC_URL", "http://127.0.0.1:8899"),
            ("SOLANA_ADDRESS", "SOLANA_ADDR"),
            ("TOKEN_MINT", "USDC_MINT"),
            ("PORT", "8080"),
            ("RPC_TIMEOUT_SECS", "5"),
            ("DATABASE_URL", "postgres://localhost/balances"),
            ("FUNCTION_NAME", "/tracker/"),
        ])
        .unwrap();

        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.rpc_timeout, Duration::from_secs(5));
        assert_eq!(config.watch.address.as_deref(), Some("SOLANA_ADDR"));
        assert_eq!(
            config.watch.asset,
            Some(AssetSelector::Mint("USDC_MINT".to_string()))
        );
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/balances")
        );
        assert_eq!(config.function_name.as_deref(), Some("tracker"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("SOLANA_RPC_URL", "  "), ("TOKEN_MINT", "")]).unwrap();

        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert!(config.watch.asset.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("RPC_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config(&[("SOLANA_RPC_URL", "not a url")]).is_err());
    }
}
