// src/ledger/mod.rs — Poker session bookkeeping
//
// The ledger is pure in-memory state: no I/O, no locking. Callers (the
// command dispatcher, the local shell) own one GameSession per room and
// render its messages and projections.

pub mod error;
pub mod format;
pub mod session;
pub mod types;

pub use error::LedgerError;
pub use session::{GameSession, PlayerRecord};
pub use types::{EventRecord, EventType, FinalResult, PlayerStats, SessionInfo};
