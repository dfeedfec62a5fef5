//! Minimal JSON-RPC 2.0 client for the wallet endpoint.
//!
//! Both the wallet requests (`eth_accounts`, `eth_requestAccounts`,
//! `eth_chainId`) and the contract traffic (`eth_call`,
//! `eth_sendTransaction`, `eth_getLogs`) go through the same endpoint,
//! which is how MetaMask-compatible providers work.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use serde_json::{json, Value};

use crate::error::WalletError;

/// EIP-1193 code for a request the user declined in the wallet UI.
const ERR_USER_REJECTED: i64 = 4001;

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Perform one JSON-RPC call and return the `result` value.
    ///
    /// Transport failure means nothing is listening at the endpoint and maps
    /// to `NoWalletProvider`; an error object in the response maps to
    /// `UserRejectedSignature` (code 4001) or `Rpc`.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("rpc -> {method}");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|_| WalletError::NoWalletProvider)?
            .error_for_status()
            .map_err(|e| WalletError::Rpc(e.to_string()))?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| WalletError::JsonParse(e.to_string()))?;

        check_error(&value)?;
        Ok(value["result"].clone())
    }

    /// Whether anything answers at the endpoint.
    pub async fn probe(&self) -> bool {
        self.call("eth_chainId", json!([])).await.is_ok()
    }
}

fn check_error(value: &Value) -> Result<(), WalletError> {
    let Some(error) = value.get("error") else {
        return Ok(());
    };
    let code = error["code"].as_i64().unwrap_or(0);
    if code == ERR_USER_REJECTED {
        return Err(WalletError::UserRejectedSignature);
    }
    let message = error["message"].as_str().unwrap_or("unknown RPC error");
    Err(WalletError::Rpc(format!("{code}: {message}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_rejection_maps_to_typed_error() {
        let response = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": 4001, "message": "User rejected the request."}});
        assert_eq!(
            check_error(&response),
            Err(WalletError::UserRejectedSignature)
        );
    }

    #[test]
    fn other_rpc_errors_keep_code_and_message() {
        let response = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "insufficient funds"}});
        match check_error(&response) {
            Err(WalletError::Rpc(msg)) => {
                assert!(msg.contains("-32000"));
                assert!(msg.contains("insufficient funds"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn success_response_passes_through() {
        let response = json!({"jsonrpc": "2.0", "id": 1, "result": "0x4"});
        assert_eq!(check_error(&response), Ok(()));
    }
}
