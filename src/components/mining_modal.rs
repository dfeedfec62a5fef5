use dioxus::prelude::*;

use crate::session::Session;

/// Blocking-looking overlay shown while a mint awaits confirmation.
#[component]
pub fn MiningModal() -> Element {
    let session = use_context::<Signal<Session>>();

    if !session.read().modal_visible {
        return rsx! {};
    }

    rsx! {
        div { class: "modal-overlay",
            div { class: "modal",
                div { class: "spinner-large" }
                p { class: "modal-text", "Mining, please wait..." }
            }
        }
    }
}
