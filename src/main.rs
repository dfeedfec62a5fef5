#![allow(non_snake_case)]

mod chain;
mod components;
mod config;
mod contract;
mod error;
mod lifecycle;
mod provider;
mod rpc;
mod session;
mod wallet;

use std::sync::Arc;

use dioxus::prelude::*;

use config::AppConfig;
use contract::EthContract;
use provider::RpcWalletProvider;
use rpc::RpcClient;
use wallet::WalletSession;

const STYLE: &str = include_str!("../assets/style.css");

const TWITTER_HANDLE: &str = "bgsamz";

fn main() {
    env_logger::init();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let session_handle = use_context_provider(|| {
        let config = AppConfig::from_env();
        let rpc = Arc::new(RpcClient::new(&config.wallet_rpc_url));
        let provider = Arc::new(RpcWalletProvider::new(Arc::clone(&rpc)));
        let contract = Arc::new(EthContract::new(rpc, &config));
        WalletSession::new(provider, contract, &config)
    });
    let mut session =
        use_context_provider(|| Signal::new(session_handle.store().get()));

    // Mirror store updates into the render signal.
    {
        let handle = session_handle.clone();
        use_future(move || {
            let handle = handle.clone();
            async move {
                let mut rx = handle.store().subscribe();
                loop {
                    let snapshot = rx.borrow_and_update().clone();
                    session.set(snapshot);
                    if rx.changed().await.is_err() {
                        break;
                    }
                }
            }
        });
    }

    // On-load wallet check; attach the event pump once an account is known.
    {
        let handle = session_handle.clone();
        use_future(move || {
            let handle = handle.clone();
            async move {
                handle.startup().await;
                if handle.store().get().account.is_some() {
                    tokio::spawn(Arc::clone(&handle).run_event_pump());
                }
            }
        });
    }

    rsx! {
        document::Style { {STYLE} }
        div { class: "app",
            div { class: "container",
                components::mint_panel::MintPanel {}
                components::mining_modal::MiningModal {}
                Footer {}
            }
        }
    }
}

#[component]
fn Footer() -> Element {
    rsx! {
        div { class: "footer-container",
            a {
                class: "footer-text",
                href: "https://twitter.com/{TWITTER_HANDLE}",
                target: "_blank",
                "@{TWITTER_HANDLE}"
            }
        }
    }
}
