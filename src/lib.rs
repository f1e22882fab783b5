// src/lib.rs — PokerPal library root

pub mod bot;
pub mod cli;
pub mod infra;
pub mod integrations;
pub mod ledger;
pub mod sheets;
pub mod util;
