// src/bot/store.rs — Per-room session store

use std::collections::HashMap;

use crate::ledger::GameSession;

/// A running session and the spreadsheet tab that mirrors it.
#[derive(Debug, Clone)]
pub struct RoomSession {
    pub ledger: GameSession,
    /// Sheet name, once the mirror created one
    pub sheet: Option<String>,
}

impl RoomSession {
    pub fn new(ledger: GameSession) -> Self {
        Self {
            ledger,
            sheet: None,
        }
    }
}

/// Sessions keyed by room. At most one session per room.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, RoomSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, room: &str) -> Option<&RoomSession> {
        self.sessions.get(room)
    }

    pub fn get_mut(&mut self, room: &str) -> Option<&mut RoomSession> {
        self.sessions.get_mut(room)
    }

    /// Install a session, returning the one it replaced.
    pub fn insert(&mut self, room: &str, session: RoomSession) -> Option<RoomSession> {
        self.sessions.insert(room.to_string(), session)
    }

    pub fn remove(&mut self, room: &str) -> Option<RoomSession> {
        self.sessions.remove(room)
    }

    pub fn contains(&self, room: &str) -> bool {
        self.sessions.contains_key(room)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Rooms with a running session, sorted.
    pub fn rooms(&self) -> Vec<&str> {
        let mut rooms: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        rooms.sort_unstable();
        rooms
    }
}
