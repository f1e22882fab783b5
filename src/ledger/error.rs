// src/ledger/error.rs — Ledger failures
//
// The Display text of each variant is the message shown to the chat user.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("❌ Invalid buy-in amount: {0}. It must be a positive number.")]
    InvalidAmount(String),

    #[error("❌ A session needs at least one player")]
    NoPlayers,

    #[error("❌ {0} is listed more than once")]
    DuplicatePlayer(String),

    #[error("❌ {0} is already in the game")]
    AlreadyActive(String),

    #[error("❌ {0} is not in the game")]
    NotActive(String),

    #[error("❌ Player {0} not found")]
    NotFound(String),

    #[error("❌ No players match")]
    NoPlayersMatch,
}
