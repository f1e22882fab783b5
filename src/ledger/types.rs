// src/ledger/types.rs — Event log and read-model records

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of entry in the session event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    /// Player present when the session was started
    Join,
    /// Player joined mid-session
    In,
    /// Player left
    Out,
    /// Player won a game
    Win,
    /// Stacks reset for the next game
    NewGame,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Join => "JOIN",
            EventType::In => "IN",
            EventType::Out => "OUT",
            EventType::Win => "WIN",
            EventType::NewGame => "NEWGAME",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable entry of the session event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub date: NaiveDate,
    pub event_type: EventType,
    pub player: String,
    pub action: String,
    pub stack: f64,
}

/// Single-game view of a player's result (final stack against one buy-in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub player: String,
    pub buy_in: f64,
    /// Rebuys are not tracked; always 0.
    pub rebuys: u32,
    pub final_stack: f64,
    pub net: f64,
}

/// Multi-game aggregate for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: String,
    pub games_played: u32,
    pub games_won: u32,
    pub total_buy_in: f64,
    pub total_won: f64,
    pub net: f64,
    pub active: bool,
}

/// Session header used by the spreadsheet mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub date: NaiveDate,
    pub buy_in: f64,
    pub initial_players: Vec<String>,
    pub current_game: u32,
    /// Sum of the active players' current stacks
    pub total_pool: f64,
}

impl SessionInfo {
    pub fn current_game_label(&self) -> String {
        format!("Game #{}", self.current_game)
    }

    pub fn initial_players_label(&self) -> String {
        self.initial_players.join(", ")
    }
}
