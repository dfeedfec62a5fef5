//! The single source of truth consumed by the rendering layer.
//!
//! One live `Session` per process, owned by the `SessionStore`. All
//! mutation funnels through `SessionStore::update`, which applies each
//! transition atomically: listeners never observe a partial session.

use tokio::sync::watch;

use crate::lifecycle::MintPhase;

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Whether a wallet endpoint answered the last presence check.
    pub wallet_available: bool,
    /// Connected account. Non-empty iff the wallet has granted access.
    pub account: Option<String>,
    /// Whether the wallet's chain matched the required one at startup.
    pub chain_valid: bool,
    pub minted_count: u64,
    pub total_supply: u64,
    /// True only while a mint awaits confirmation (`phase == Confirming`).
    pub modal_visible: bool,
    pub phase: MintPhase,
    /// One-shot user-visible notice for the most recent failure.
    pub last_error: Option<String>,
    /// Token id of the most recent mint event addressed to our account.
    pub last_minted_token: Option<u64>,
}

impl Session {
    fn new(total_supply: u64) -> Self {
        Self {
            wallet_available: false,
            account: None,
            chain_valid: false,
            minted_count: 0,
            total_supply,
            modal_visible: false,
            phase: MintPhase::Idle,
            last_error: None,
            last_minted_token: None,
        }
    }

    /// The mint action is enabled iff an account is connected, the chain is
    /// valid, and no mint is in flight.
    pub fn mint_enabled(&self) -> bool {
        self.account.is_some() && self.chain_valid && self.phase == MintPhase::Idle
    }
}

pub struct SessionStore {
    tx: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new(total_supply: u64) -> Self {
        let (tx, _rx) = watch::channel(Session::new(total_supply));
        Self { tx }
    }

    /// Synchronous snapshot of the current session.
    pub fn get(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Change subscription for the rendering layer.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Apply one transition atomically and notify subscribers.
    pub(crate) fn update<F: FnOnce(&mut Session)>(&self, mutate: F) {
        self.tx.send_modify(mutate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_detached_from_store() {
        let store = SessionStore::new(100);
        let before = store.get();
        store.update(|s| s.minted_count = 5);
        assert_eq!(before.minted_count, 0);
        assert_eq!(store.get().minted_count, 5);
    }

    #[tokio::test]
    async fn subscribers_see_whole_transitions() {
        let store = SessionStore::new(100);
        let mut rx = store.subscribe();

        store.update(|s| {
            s.account = Some("0xabc".into());
            s.chain_valid = true;
        });

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        // Both fields of the transition land together.
        assert_eq!(seen.account.as_deref(), Some("0xabc"));
        assert!(seen.chain_valid);
    }

    #[test]
    fn mint_gating() {
        let mut session = Session::new(100);
        assert!(!session.mint_enabled());

        session.account = Some("0xabc".into());
        assert!(!session.mint_enabled());

        session.chain_valid = true;
        assert!(session.mint_enabled());

        session.phase = MintPhase::Submitting;
        assert!(!session.mint_enabled());
    }
}
