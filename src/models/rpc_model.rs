use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub result: Option<TransactionResult>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `getTransaction` result. Every field the balance extraction reads is optional
/// or defaulted so a partially populated record still deserializes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionResult {
    #[serde(default)]
    pub slot: u64,
    #[serde(rename = "blockTime", default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub transaction: TransactionData,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    #[serde(default)]
    pub version: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionData {
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub message: TransactionMessage,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionMessage {
    #[serde(rename = "accountKeys", default)]
    pub account_keys: Vec<AccountKey>,
    #[serde(rename = "recentBlockhash", default)]
    pub recent_blockhash: Option<String>,
}

/// `jsonParsed` encoding returns objects, plain `json` encoding returns bare strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AccountKey {
    Parsed {
        pubkey: String,
        #[serde(default)]
        signer: bool,
        #[serde(default)]
        writable: bool,
    },
    Plain(String),
}

impl AccountKey {
    pub fn pubkey(&self) -> &str {
        match self {
            AccountKey::Parsed { pubkey, .. } => pubkey,
            AccountKey::Plain(pubkey) => pubkey,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub fee: u64,
    #[serde(rename = "preBalances", default)]
    pub pre_balances: Vec<u64>,
    #[serde(rename = "postBalances", default)]
    pub post_balances: Vec<u64>,
    #[serde(rename = "preTokenBalances", default)]
    pub pre_token_balances: Option<Vec<TokenBalance>>,
    #[serde(rename = "postTokenBalances", default)]
    pub post_token_balances: Option<Vec<TokenBalance>>,
    #[serde(rename = "loadedAddresses", default)]
    pub loaded_addresses: Option<LoadedAddresses>,
}

/// Address-lookup-table accounts of a versioned transaction. They extend the
/// account index space after the static keys, writable first.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoadedAddresses {
    #[serde(default)]
    pub writable: Vec<String>,
    #[serde(default)]
    pub readonly: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenBalance {
    #[serde(rename = "accountIndex", default)]
    pub account_index: usize,
    #[serde(default)]
    pub mint: String,
    #[serde(rename = "uiTokenAmount", default)]
    pub ui_token_amount: UiTokenAmount,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UiTokenAmount {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(rename = "uiAmount", default)]
    pub ui_amount: Option<f64>,
    #[serde(rename = "uiAmountString", default)]
    pub ui_amount_string: Option<String>,
}

impl TransactionResult {
    /// Full account index space: static keys, then loaded writable and readonly addresses.
    pub fn account_keys(&self) -> impl Iterator<Item = &str> {
        let loaded = self.meta.as_ref().and_then(|m| m.loaded_addresses.as_ref());

        self.transaction
            .message
            .account_keys
            .iter()
            .map(AccountKey::pubkey)
            .chain(
                loaded
                    .into_iter()
                    .flat_map(|l| l.writable.iter().chain(l.readonly.iter()))
                    .map(String::as_str),
            )
    }
}
