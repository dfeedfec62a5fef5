//! Transaction lifecycle: submit, await confirmation, settle.
//!
//! One mint may be in flight per session. A request arriving while the
//! controller is not idle is dropped, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info, warn};

use crate::contract::NftContract;
use crate::error::WalletError;
use crate::session::SessionStore;

/// Per-mint state machine:
/// `Idle -> Submitting -> { Confirming -> { Success, Failed }, Rejected }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintPhase {
    Idle,
    Submitting,
    Confirming,
    Success,
    Failed,
    Rejected,
}

pub struct MintController {
    contract: Arc<dyn NftContract>,
    store: Arc<SessionStore>,
    in_flight: AtomicBool,
}

impl MintController {
    pub fn new(contract: Arc<dyn NftContract>, store: Arc<SessionStore>) -> Self {
        Self {
            contract,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Drive one mint to a terminal phase, then settle back to idle.
    pub async fn request_mint(&self, account: &str) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("mint already in flight, ignoring request");
            return;
        }

        self.store.update(|s| {
            s.phase = MintPhase::Submitting;
            s.last_error = None;
        });
        self.drive(account).await;
        self.store.update(|s| s.phase = MintPhase::Idle);
        self.in_flight.store(false, Ordering::Release);
    }

    async fn drive(&self, account: &str) {
        let handle = match self.contract.mint(account).await {
            Ok(handle) => handle,
            Err(WalletError::UserRejectedSignature) => {
                info!("signature request rejected in wallet");
                self.store.update(|s| {
                    s.phase = MintPhase::Rejected;
                    s.modal_visible = false;
                    s.last_error = Some(WalletError::UserRejectedSignature.to_string());
                });
                return;
            }
            Err(e) => {
                error!("mint submission failed: {e}");
                self.store.update(|s| {
                    s.phase = MintPhase::Failed;
                    s.modal_visible = false;
                    s.last_error = Some(e.to_string());
                });
                return;
            }
        };

        info!("transaction submitted: {}", handle.hash);
        self.store.update(|s| {
            s.phase = MintPhase::Confirming;
            s.modal_visible = true;
        });

        match self.contract.confirm(&handle).await {
            Ok(()) => {
                info!("transaction confirmed: {}", handle.hash);
                self.store.update(|s| {
                    s.phase = MintPhase::Success;
                    s.modal_visible = false;
                });
                // Converges with the event-driven refresh; duplicates are harmless.
                refresh_minted_count(self.contract.as_ref(), &self.store).await;
            }
            Err(e) => {
                error!("transaction failed: {e}");
                self.store.update(|s| {
                    s.phase = MintPhase::Failed;
                    s.modal_visible = false;
                    s.last_error = Some(e.to_string());
                });
            }
        }
    }
}

/// Idempotent read-refresh of the minted count. On failure the previously
/// known count is retained.
pub(crate) async fn refresh_minted_count(contract: &dyn NftContract, store: &SessionStore) {
    match contract.minted_count().await {
        Ok(count) => store.update(|s| s.minted_count = count),
        Err(e) => warn!("minted count refresh failed, keeping previous value: {e}"),
    }
}
