//! Session facade: composes the wallet gateway, chain validator, contract
//! client and lifecycle controller around the single session store.
//!
//! This is the whole inbound surface for the rendering layer: `startup`,
//! `connect_wallet`, `mint_request`, plus the long-lived mint-event pump.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use log::{info, warn};

use crate::chain;
use crate::config::AppConfig;
use crate::contract::NftContract;
use crate::error::WalletError;
use crate::lifecycle::{refresh_minted_count, MintController};
use crate::provider::WalletProvider;
use crate::session::SessionStore;

pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    contract: Arc<dyn NftContract>,
    store: Arc<SessionStore>,
    controller: MintController,
    required_chain: String,
    contract_address: String,
    events_attached: AtomicBool,
}

impl WalletSession {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        contract: Arc<dyn NftContract>,
        config: &AppConfig,
    ) -> Arc<Self> {
        let store = Arc::new(SessionStore::new(config.total_supply));
        let controller = MintController::new(Arc::clone(&contract), Arc::clone(&store));
        Arc::new(Self {
            provider,
            contract,
            store,
            controller,
            required_chain: config.required_chain_id.clone(),
            contract_address: config.contract_address.clone(),
            events_attached: AtomicBool::new(false),
        })
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    /// On-load population: wallet presence, chain validity, any already
    /// authorized account, and the initial minted count. Never prompts.
    pub async fn startup(&self) {
        if !self.provider.is_available().await {
            info!("no wallet provider detected, wallet actions disabled");
            self.store.update(|s| s.wallet_available = false);
            return;
        }
        self.store.update(|s| s.wallet_available = true);

        match self.provider.chain_id().await {
            Ok(chain_id) => {
                let valid = chain::chain_matches(&chain_id, &self.required_chain);
                if valid {
                    self.store.update(|s| s.chain_valid = true);
                } else {
                    warn!(
                        "wallet is on chain {chain_id}, required {}",
                        self.required_chain
                    );
                    self.store.update(|s| {
                        s.chain_valid = false;
                        s.last_error = Some(WalletError::WrongChain.to_string());
                    });
                }
            }
            Err(e) => warn!("chain id check failed: {e}"),
        }

        match self.provider.authorized_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    info!("found authorized account: {account}");
                    self.store.update(|s| s.account = Some(account));
                }
                None => info!("no authorized accounts found"),
            },
            Err(e) => warn!("authorized account check failed: {e}"),
        }

        refresh_minted_count(self.contract.as_ref(), &self.store).await;
    }

    /// Ask the wallet for account access. A rejection or an absent wallet
    /// resolves to a session notice, never an escaping fault.
    pub async fn connect_wallet(&self) {
        if !self.provider.is_available().await {
            info!("connect requested without a wallet provider");
            self.store.update(|s| {
                s.wallet_available = false;
                s.last_error = Some(WalletError::NoWalletProvider.to_string());
            });
            return;
        }
        self.store.update(|s| s.wallet_available = true);

        if !self.store.get().chain_valid {
            info!("connect blocked: wrong chain");
            self.store
                .update(|s| s.last_error = Some(WalletError::WrongChain.to_string()));
            return;
        }

        match self.provider.request_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    info!("connected to {account}");
                    self.store.update(|s| {
                        s.account = Some(account);
                        s.last_error = None;
                    });
                }
                None => warn!("wallet granted access but returned no accounts"),
            },
            Err(e) => {
                info!("wallet connect failed: {e}");
                self.store.update(|s| s.last_error = Some(e.to_string()));
            }
        }
    }

    /// User-initiated mint. A no-op unless an account is connected, the
    /// chain is valid, and no mint is already in flight.
    pub async fn mint_request(&self) {
        let session = self.store.get();
        if !session.chain_valid {
            info!("mint unavailable: wrong chain");
            return;
        }
        let Some(account) = session.account else {
            info!("mint unavailable: no connected account");
            return;
        };
        self.controller.request_mint(&account).await;
    }

    pub async fn refresh_minted_count(&self) {
        refresh_minted_count(self.contract.as_ref(), &self.store).await;
    }

    /// Consume the contract's mint-event stream for the rest of the session,
    /// refreshing the minted count on every delivery. At most one pump per
    /// session; extra calls return immediately.
    pub async fn run_event_pump(self: Arc<Self>) {
        if self.events_attached.swap(true, Ordering::AcqRel) {
            warn!("mint event pump already running");
            return;
        }

        let mut events = self.contract.mint_events();
        while let Some(event) = events.next().await {
            info!(
                "mint event: token #{} -> {}",
                event.token_id, event.recipient
            );
            let ours = self.store.get().account.as_deref() == Some(event.recipient.as_str());
            if ours {
                self.store
                    .update(|s| s.last_minted_token = Some(event.token_id));
            }
            refresh_minted_count(self.contract.as_ref(), &self.store).await;
        }
        info!("mint event stream ended");
    }
}
