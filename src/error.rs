//! Error taxonomy for the wallet and contract boundaries.
//!
//! Every failure that crosses into this crate is translated into one of
//! these variants at the component boundary; none of them is fatal to the
//! process.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No wallet endpoint is reachable. All wallet-dependent actions are
    /// disabled while this holds.
    #[error("no wallet provider detected")]
    NoWalletProvider,
    /// The user declined the request in the wallet's consent UI
    /// (JSON-RPC error code 4001).
    #[error("signature request rejected in wallet")]
    UserRejectedSignature,
    /// The wallet is connected to a chain other than the required one.
    #[error("wallet is connected to the wrong chain")]
    WrongChain,
    /// The transaction could not be signed and broadcast.
    #[error("transaction submission failed: {0}")]
    Submission(String),
    /// The transaction was broadcast but reverted or could not be confirmed.
    #[error("transaction confirmation failed: {0}")]
    Confirmation(String),
    /// A contract read failed. The previously known value is retained.
    #[error("contract read failed: {0}")]
    Read(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}
