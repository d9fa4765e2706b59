use crate::error::LedgerError;
use crate::models::rpc_model::{RpcResponse, TransactionResult};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// JSON-RPC "invalid params": the node rejected the signature itself.
const INVALID_PARAMS: i64 = -32602;

/// Source of parsed transactions, keyed by signature.
///
/// `Ok(None)` means the ledger has no confirmed transaction for the signature.
/// Transport and RPC faults are reported as errors so callers can tell a
/// terminal absence from a retriable failure.
#[async_trait]
pub trait TransactionFetcher: Send + Sync {
    async fn fetch_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionResult>, LedgerError>;
}

pub struct RpcTransactionFetcher {
    client: reqwest::Client,
    rpc_url: String,
}

impl RpcTransactionFetcher {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }

    fn request_body(signature: &str) -> serde_json::Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "encoding": "jsonParsed",
                    "commitment": "confirmed",
                    "maxSupportedTransactionVersion": 0
                }
            ]
        })
    }
}

#[async_trait]
impl TransactionFetcher for RpcTransactionFetcher {
    async fn fetch_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionResult>, LedgerError> {
        debug!(signature, "Fetching transaction");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&Self::request_body(signature))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let rpc: RpcResponse =
            serde_json::from_str(&body).map_err(|e| LedgerError::Decode(e.to_string()))?;

        if let Some(error) = rpc.error {
            if error.code == INVALID_PARAMS {
                warn!(signature, "RPC rejected signature: {}", error.message);
                return Ok(None);
            }
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        if rpc.result.is_none() {
            debug!(signature, "Transaction not found");
        }

        Ok(rpc.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SIG: &str =
        "5j7s6NiJS3JAkvgkoc18WVAsiSaci2pxB2A6ueCJP4tprA2TFg9wSyTLeYouxPBJEMzJinENTkpA52YStRW5Dia7";

    fn fetcher(server: &MockServer) -> RpcTransactionFetcher {
        RpcTransactionFetcher::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn requests_confirmed_versioned_transaction() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "getTransaction",
                "params": [
                    SIG,
                    {
                        "encoding": "jsonParsed",
                        "commitment": "confirmed",
                        "maxSupportedTransactionVersion": 0
                    }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": {
                    "slot": 123456,
                    "blockTime": 1678888888,
                    "transaction": {
                        "signatures": [SIG],
                        "message": {
                            "accountKeys": [
                                { "pubkey": "OWNER", "signer": true, "writable": true }
                            ],
                            "instructions": [],
                            "recentBlockhash": "11111111111111111111111111111111"
                        }
                    },
                    "meta": {
                        "err": null,
                        "fee": 5000,
                        "preBalances": [10],
                        "postBalances": [5],
                        "preTokenBalances": [],
                        "postTokenBalances": [],
                        "logMessages": []
                    },
                    "version": 0
                },
                "id": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tx = fetcher(&server).fetch_transaction(SIG).await.unwrap().unwrap();

        assert_eq!(tx.slot, 123456);
        assert_eq!(tx.block_time, Some(1678888888));
        assert_eq!(tx.transaction.signatures, vec![SIG.to_string()]);
        assert_eq!(tx.meta.unwrap().post_balances, vec![5]);
    }

    #[tokio::test]
    async fn null_result_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": null,
                "id": 1
            })))
            .mount(&server)
            .await;

        let result = fetcher(&server).fetch_transaction(SIG).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn invalid_signature_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": { "code": -32602, "message": "Invalid param: WrongSize" },
                "id": 1
            })))
            .mount(&server)
            .await;

        let result = fetcher(&server).fetch_transaction("bogus").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn rpc_error_is_propagated() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": { "code": -32005, "message": "Node is behind" },
                "id": 1
            })))
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch_transaction(SIG).await.unwrap_err();

        assert!(matches!(err, LedgerError::Rpc { code: -32005, .. }));
    }

    #[tokio::test]
    async fn http_failure_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch_transaction(SIG).await.unwrap_err();

        assert!(matches!(err, LedgerError::Transport(_)));
    }

    #[tokio::test]
    async fn non_rpc_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch_transaction(SIG).await.unwrap_err();

        assert!(matches!(err, LedgerError::Decode(_)));
    }
}
