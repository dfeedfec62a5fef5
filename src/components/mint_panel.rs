use std::sync::Arc;

use dioxus::prelude::*;

use crate::lifecycle::MintPhase;
use crate::session::Session;
use crate::wallet::WalletSession;

#[component]
pub fn MintPanel() -> Element {
    let session = use_context::<Signal<Session>>();
    let handle = use_context::<Arc<WalletSession>>();

    let snapshot = session.read().clone();
    let busy = matches!(
        snapshot.phase,
        MintPhase::Submitting | MintPhase::Confirming
    );

    let on_connect = {
        let handle = handle.clone();
        move |_| {
            let handle = handle.clone();
            spawn(async move {
                handle.connect_wallet().await;
                if handle.store().get().account.is_some() {
                    tokio::spawn(Arc::clone(&handle).run_event_pump());
                }
            });
        }
    };

    let on_mint = {
        let handle = handle.clone();
        move |_| {
            let handle = handle.clone();
            spawn(async move {
                handle.mint_request().await;
            });
        }
    };

    rsx! {
        div { class: "header-container",
            p { class: "header gradient-text", "Smiley NFT Collection" }
            p { class: "sub-text", "A collection of uniquely generated smiley (and frowny) faces." }
            p { class: "mint-count", "{snapshot.minted_count} / {snapshot.total_supply} minted" }

            if snapshot.account.is_none() {
                button {
                    class: "cta-button connect-wallet-button",
                    disabled: !snapshot.wallet_available || !snapshot.chain_valid,
                    onclick: on_connect,
                    "Connect to Wallet"
                }
            } else {
                button {
                    class: "cta-button connect-wallet-button",
                    disabled: !snapshot.mint_enabled(),
                    onclick: on_mint,
                    if busy { "Minting..." } else { "Mint NFT" }
                }
            }

            if snapshot.wallet_available && !snapshot.chain_valid {
                p { class: "error-text",
                    "Wrong network. Switch your wallet to the required chain."
                }
            }
            if let Some(msg) = &snapshot.last_error {
                p { class: "error-text", "{msg}" }
            }
            if let Some(token) = snapshot.last_minted_token {
                p { class: "success-text",
                    "Your NFT is minted! See it at "
                    a {
                        href: "{opensea_link(handle.contract_address(), token)}",
                        target: "_blank",
                        "OpenSea"
                    }
                }
            }
        }
    }
}

fn opensea_link(contract_address: &str, token_id: u64) -> String {
    format!("https://testnets.opensea.io/assets/{contract_address}/{token_id}")
}
