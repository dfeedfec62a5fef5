pub mod mining_modal;
pub mod mint_panel;
