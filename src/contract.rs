//! Typed client for the smiley NFT contract.
//!
//! Three operations cross this boundary: the minted-count read, the mint
//! write (submission then confirmation), and the mint-event subscription.
//! The write is two-phase: `mint` returns a handle once the wallet has
//! signed and broadcast, `confirm` suspends on that handle until the
//! transaction is mined or errors.

use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use log::{info, warn};
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};

use crate::config::AppConfig;
use crate::error::WalletError;
use crate::rpc::RpcClient;

const MINTED_COUNT_SIGNATURE: &str = "getNumberMinted()";
const MINT_SIGNATURE: &str = "mintSmileyNFT()";
const MINT_EVENT_SIGNATURE: &str = "NewSmileyNFTMinted(address,uint256)";

/// Reference to a submitted, not-yet-confirmed transaction.
#[derive(Clone, Debug)]
pub struct TxHandle {
    pub hash: String,
}

/// One completed mint, delivered by the contract's event topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintEvent {
    pub recipient: String,
    pub token_id: u64,
}

#[async_trait]
pub trait NftContract: Send + Sync {
    async fn minted_count(&self) -> Result<u64, WalletError>;
    /// Submit a mint from the given account. Suspends while the wallet
    /// prompts for gas approval.
    async fn mint(&self, from: &str) -> Result<TxHandle, WalletError>;
    /// Wait until the submitted transaction is mined. No timeout: bounded
    /// only by the remote network.
    async fn confirm(&self, handle: &TxHandle) -> Result<(), WalletError>;
    /// Lazy, infinite, non-restartable sequence of mint events.
    fn mint_events(&self) -> BoxStream<'static, MintEvent>;
}

pub struct EthContract {
    rpc: Arc<RpcClient>,
    address: String,
    poll_interval: Duration,
}

impl EthContract {
    pub fn new(rpc: Arc<RpcClient>, config: &AppConfig) -> Self {
        Self {
            rpc,
            address: config.contract_address.clone(),
            poll_interval: config.poll_interval,
        }
    }
}

#[async_trait]
impl NftContract for EthContract {
    async fn minted_count(&self) -> Result<u64, WalletError> {
        let params = json!([
            { "to": self.address, "data": selector_data(MINTED_COUNT_SIGNATURE) },
            "latest",
        ]);
        let result = self
            .rpc
            .call("eth_call", params)
            .await
            .map_err(|e| WalletError::Read(e.to_string()))?;
        let word = result
            .as_str()
            .ok_or_else(|| WalletError::Read("non-string call result".into()))?;
        decode_u64_hex(word).map_err(|e| WalletError::Read(e.to_string()))
    }

    async fn mint(&self, from: &str) -> Result<TxHandle, WalletError> {
        let params = json!([
            { "from": from, "to": self.address, "data": selector_data(MINT_SIGNATURE) },
        ]);
        let result = match self.rpc.call("eth_sendTransaction", params).await {
            Ok(result) => result,
            Err(WalletError::UserRejectedSignature) => {
                return Err(WalletError::UserRejectedSignature)
            }
            Err(e) => return Err(WalletError::Submission(e.to_string())),
        };
        let hash = result
            .as_str()
            .ok_or_else(|| WalletError::Submission("non-string transaction hash".into()))?;
        Ok(TxHandle {
            hash: hash.to_string(),
        })
    }

    async fn confirm(&self, handle: &TxHandle) -> Result<(), WalletError> {
        loop {
            let receipt = self
                .rpc
                .call("eth_getTransactionReceipt", json!([handle.hash]))
                .await
                .map_err(|e| WalletError::Confirmation(e.to_string()))?;

            if receipt.is_null() {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }
            return match receipt["status"].as_str() {
                Some("0x1") => Ok(()),
                Some("0x0") => Err(WalletError::Confirmation("transaction reverted".into())),
                other => Err(WalletError::Confirmation(format!(
                    "unexpected receipt status: {other:?}"
                ))),
            };
        }
    }

    fn mint_events(&self) -> BoxStream<'static, MintEvent> {
        let rpc = Arc::clone(&self.rpc);
        let address = self.address.clone();
        let topic = event_topic(MINT_EVENT_SIGNATURE);
        let interval = self.poll_interval;

        let events = stream! {
            info!("subscribed to {MINT_EVENT_SIGNATURE} logs");
            let mut cursor = None;
            loop {
                match fetch_mint_logs(&rpc, &address, &topic, &mut cursor).await {
                    Ok(batch) => {
                        for event in batch {
                            yield event;
                        }
                    }
                    Err(e) => warn!("mint event poll failed: {e}"),
                }
                tokio::time::sleep(interval).await;
            }
        };
        Box::pin(events)
    }
}

async fn fetch_mint_logs(
    rpc: &RpcClient,
    address: &str,
    topic: &str,
    cursor: &mut Option<u64>,
) -> Result<Vec<MintEvent>, WalletError> {
    let from = match *cursor {
        Some(block) => block,
        None => {
            // First poll: start at the current head, past events are not replayed.
            let head = rpc.call("eth_blockNumber", json!([])).await?;
            let head = head
                .as_str()
                .ok_or_else(|| WalletError::JsonParse("non-string block number".into()))
                .and_then(decode_u64_hex)?;
            *cursor = Some(head);
            head
        }
    };

    let params = json!([{
        "fromBlock": format!("0x{from:x}"),
        "toBlock": "latest",
        "address": address,
        "topics": [topic],
    }]);
    let result = rpc.call("eth_getLogs", params).await?;
    let logs = result
        .as_array()
        .ok_or_else(|| WalletError::JsonParse("non-array log response".into()))?;

    let mut events = Vec::new();
    let mut max_seen = from;
    for log in logs {
        match decode_mint_event(log) {
            Ok(event) => events.push(event),
            Err(e) => warn!("skipping undecodable mint log: {e}"),
        }
        if let Some(block) = log["blockNumber"].as_str().and_then(|s| decode_u64_hex(s).ok()) {
            max_seen = max_seen.max(block);
        }
    }
    if !events.is_empty() {
        *cursor = Some(max_seen + 1);
    }
    Ok(events)
}

/// Calldata for a zero-argument call: the 4-byte keccak selector.
fn selector_data(signature: &str) -> String {
    format!("0x{}", hex::encode(&keccak(signature.as_bytes())[..4]))
}

/// Log topic for an event signature: the full keccak hash.
fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak(signature.as_bytes())))
}

fn keccak(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

/// Decode a hex quantity or 32-byte return word into a u64.
fn decode_u64_hex(word: &str) -> Result<u64, WalletError> {
    let digits = word.strip_prefix("0x").unwrap_or(word);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if digits.len() > 16 {
        return Err(WalletError::JsonParse(format!(
            "quantity overflows u64: {word}"
        )));
    }
    u64::from_str_radix(digits, 16).map_err(|e| WalletError::JsonParse(e.to_string()))
}

/// Decode `NewSmileyNFTMinted(address sender, uint256 tokenId)` log data.
/// Both fields are non-indexed: two ABI words in the data blob.
fn decode_mint_event(log: &Value) -> Result<MintEvent, WalletError> {
    let data = log["data"]
        .as_str()
        .ok_or_else(|| WalletError::JsonParse("log without data field".into()))?;
    let raw = hex::decode(data.strip_prefix("0x").unwrap_or(data))
        .map_err(|e| WalletError::JsonParse(e.to_string()))?;
    if raw.len() < 64 {
        return Err(WalletError::JsonParse(format!(
            "short event data: {} bytes",
            raw.len()
        )));
    }
    if raw[32..56].iter().any(|b| *b != 0) {
        return Err(WalletError::JsonParse("token id overflows u64".into()));
    }

    let recipient = format!("0x{}", hex::encode(&raw[12..32]));
    let mut id_bytes = [0u8; 8];
    id_bytes.copy_from_slice(&raw[56..64]);
    Ok(MintEvent {
        recipient,
        token_id: u64::from_be_bytes(id_bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_known_keccak() {
        // keccak("transfer(address,uint256)")[..4] is the canonical ERC-20 selector.
        assert_eq!(selector_data("transfer(address,uint256)"), "0xa9059cbb");
    }

    #[test]
    fn event_topic_matches_known_keccak() {
        assert_eq!(
            event_topic("Transfer(address,address,uint256)"),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn decodes_return_words_and_quantities() {
        assert_eq!(decode_u64_hex("0x0").unwrap(), 0);
        assert_eq!(decode_u64_hex("0x25").unwrap(), 37);
        let word = format!("0x{:0>64}", "25");
        assert_eq!(decode_u64_hex(&word).unwrap(), 37);
        assert!(decode_u64_hex("0xzz").is_err());
        let too_big = format!("0x{}", "f".repeat(64));
        assert!(decode_u64_hex(&too_big).is_err());
    }

    #[test]
    fn decodes_mint_event_data() {
        // address word (12 zero bytes + 20 address bytes) then uint256 word.
        let data = format!(
            "0x{:0>24}{}{:0>64}",
            "", "00aa11bb22cc33dd44ee55ff66aa77bb88cc99dd", "7"
        );
        let log = json!({"data": data, "blockNumber": "0x10"});
        let event = decode_mint_event(&log).unwrap();
        assert_eq!(event.recipient, "0x00aa11bb22cc33dd44ee55ff66aa77bb88cc99dd");
        assert_eq!(event.token_id, 7);
    }

    #[test]
    fn rejects_short_event_data() {
        let log = json!({"data": "0x00"});
        assert!(decode_mint_event(&log).is_err());
    }

    #[test]
    fn rejects_oversized_token_id() {
        let data = format!("0x{:0>64}{}", "1", "f".repeat(64));
        let log = json!({"data": data});
        assert!(decode_mint_event(&log).is_err());
    }
}
