// src/infra/errors.rs — Error types for PokerPal
//
// Ledger and command errors stay in their own enums; their Display text is
// the chat reply. This enum covers everything around them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PokerPalError {
    // Spreadsheet mirror (best-effort, never rolls back the ledger)
    #[error("Spreadsheet '{sheet}' sync failed: {message}")]
    SheetSync { sheet: String, message: String },

    // Integrations
    #[error("No chat integrations configured. Enable discord or rocketchat in config.toml.")]
    NoIntegrations,

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
