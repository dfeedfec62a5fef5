//! Externally supplied configuration. The core consumes these values, it
//! never computes or validates them.

use std::env;
use std::time::Duration;

/// Local wallet signer endpoint (Frame-style, MetaMask-compatible JSON-RPC).
pub const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:1248";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xfaaa4ac58da87b89d0d97698140feac5d86e1273";
/// Rinkeby.
pub const DEFAULT_REQUIRED_CHAIN_ID: &str = "0x4";
pub const DEFAULT_TOTAL_SUPPLY: u64 = 50;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub wallet_rpc_url: String,
    pub contract_address: String,
    pub required_chain_id: String,
    pub total_supply: u64,
    /// Interval for receipt and event-log polling.
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wallet_rpc_url: DEFAULT_WALLET_RPC_URL.to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            required_chain_id: DEFAULT_REQUIRED_CHAIN_ID.to_string(),
            total_supply: DEFAULT_TOTAL_SUPPLY,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl AppConfig {
    /// Compiled defaults with `SMILEY_*` environment overrides.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            wallet_rpc_url: env::var("SMILEY_WALLET_RPC_URL").unwrap_or(defaults.wallet_rpc_url),
            contract_address: env::var("SMILEY_CONTRACT_ADDRESS")
                .unwrap_or(defaults.contract_address),
            required_chain_id: env::var("SMILEY_REQUIRED_CHAIN_ID")
                .unwrap_or(defaults.required_chain_id),
            total_supply: env::var("SMILEY_TOTAL_SUPPLY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.total_supply),
            poll_interval: env::var("SMILEY_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
        }
    }
}
