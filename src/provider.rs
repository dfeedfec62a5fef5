//! Gateway to the wallet provider: account access and chain identity.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::WalletError;
use crate::rpc::RpcClient;

/// The three request kinds the wallet answers, plus a presence check.
///
/// `request_accounts` may open the wallet's consent dialog and suspends
/// until the user responds or the wallet errors.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn is_available(&self) -> bool;
    /// Accounts already authorized for this origin. Never prompts.
    async fn authorized_accounts(&self) -> Result<Vec<String>, WalletError>;
    /// Ask the wallet for account access. Interactive, may reject.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;
    async fn chain_id(&self) -> Result<String, WalletError>;
}

pub struct RpcWalletProvider {
    rpc: Arc<RpcClient>,
}

impl RpcWalletProvider {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn is_available(&self) -> bool {
        self.rpc.probe().await
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, WalletError> {
        let result = self.rpc.call("eth_accounts", json!([])).await?;
        parse_accounts(&result)
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let result = self.rpc.call("eth_requestAccounts", json!([])).await?;
        parse_accounts(&result)
    }

    async fn chain_id(&self) -> Result<String, WalletError> {
        let result = self.rpc.call("eth_chainId", json!([])).await?;
        result
            .as_str()
            .map(String::from)
            .ok_or_else(|| WalletError::JsonParse("non-string chain id".into()))
    }
}

fn parse_accounts(value: &Value) -> Result<Vec<String>, WalletError> {
    let entries = value
        .as_array()
        .ok_or_else(|| WalletError::JsonParse("non-array account list".into()))?;
    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(String::from)
                .ok_or_else(|| WalletError::JsonParse("non-string account entry".into()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_list() {
        let value = json!(["0xabc", "0xdef"]);
        assert_eq!(
            parse_accounts(&value).unwrap(),
            vec!["0xabc".to_string(), "0xdef".to_string()]
        );
    }

    #[test]
    fn empty_account_list_is_ok() {
        assert!(parse_accounts(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_account_list() {
        assert!(parse_accounts(&json!("0xabc")).is_err());
        assert!(parse_accounts(&json!([42])).is_err());
    }
}
