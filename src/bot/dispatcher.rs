// src/bot/dispatcher.rs — Routes chat commands to room sessions
//
// Handles one message at a time. Ledger changes are never rolled back when
// the spreadsheet mirror fails; the room gets a warning instead.

use crate::bot::command::{self, PokerCommand};
use crate::bot::store::{RoomSession, SessionStore};
use crate::ledger::format::money;
use crate::ledger::{GameSession, LedgerError};
use crate::sheets::SheetMirror;

pub const SYNC_WARNING: &str = "⚠️ Warning: Failed to save to spreadsheet, but game will continue.";
pub const FINALIZE_WARNING: &str = "⚠️ Error updating final results in sheet.";
pub const SESSION_ENDED: &str = "👋 Session ended!";

const PREVIOUS_RESULTS_HEADER: &str = "📊 **Final Results of Previous Session:**\n";
const FINAL_RESULTS_HEADER: &str = "📊 **Final Session Results:**\n";

/// Reply for session commands sent to a room without a session.
pub fn no_session_reply(prefix: &str) -> String {
    format!("❌ No active game session. Start one with {prefix} start")
}

/// Command dispatcher owning every room's session.
pub struct Dispatcher {
    store: SessionStore,
    mirror: Option<SheetMirror>,
    prefix: String,
}

impl Dispatcher {
    pub fn new(prefix: impl Into<String>, mirror: Option<SheetMirror>) -> Self {
        Self {
            store: SessionStore::new(),
            mirror,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    /// Handle one chat line from `room`. Returns the replies to post, in
    /// order; empty when the line is not a command.
    pub async fn handle(&mut self, room: &str, text: &str) -> Vec<String> {
        let command = match command::parse(text, &self.prefix) {
            Ok(Some(c)) => c,
            Ok(None) => return Vec::new(),
            Err(e) => return vec![e.to_string()],
        };
        tracing::debug!("[{room}] command: {command:?}");

        if command.needs_session() && !self.store.contains(room) {
            return vec![no_session_reply(&self.prefix)];
        }

        match command {
            PokerCommand::Ping => vec!["pong".to_string()],
            PokerCommand::Help => vec![command::help_text(&self.prefix)],
            PokerCommand::Start { buy_in, players } => self.start(room, buy_in, &players).await,
            PokerCommand::In(name) => self.mutate(room, |l| l.add_player(&name)).await,
            PokerCommand::Out(name) => self.mutate(room, |l| l.remove_player(&name)).await,
            PokerCommand::Win(name) => self.mutate(room, |l| l.set_winner(&name)).await,
            PokerCommand::Pnl(name) => self.read(room, |l| {
                l.get_player_pnl(name.as_deref())
                    .unwrap_or_else(|e| e.to_string())
            }),
            PokerCommand::Events => self.read(room, GameSession::format_events),
            PokerCommand::End => self.end(room).await,
        }
    }

    async fn start(&mut self, room: &str, buy_in: f64, players: &[String]) -> Vec<String> {
        let ledger = match GameSession::new(buy_in, players, None) {
            Ok(l) => l,
            Err(e) => return vec![e.to_string()],
        };

        let mut replies = Vec::new();
        if let Some(previous) = self.store.remove(room) {
            replies.extend(self.close(previous, PREVIOUS_RESULTS_HEADER).await);
        }

        replies.push(
            [
                "🎲 **New Poker Session Started!**".to_string(),
                format!("💵 Buy-in: {}", money(buy_in)),
                format!("👥 Players: {}", players.join(", ")),
                format!("💰 Prize Pool: {}", money(ledger.prize_pool())),
                "\n🎮 Game #1 is starting now!".to_string(),
            ]
            .join("\n"),
        );
        tracing::info!(
            "[{room}] session started: buy-in {}, players {}",
            money(buy_in),
            players.join(", ")
        );

        self.store.insert(room, RoomSession::new(ledger));
        replies.extend(self.sync(room).await);
        replies
    }

    async fn mutate<F>(&mut self, room: &str, op: F) -> Vec<String>
    where
        F: FnOnce(&mut GameSession) -> Result<String, LedgerError>,
    {
        let Some(session) = self.store.get_mut(room) else {
            return vec![no_session_reply(&self.prefix)];
        };

        match op(&mut session.ledger) {
            Ok(message) => {
                let mut replies = vec![message];
                replies.extend(self.sync(room).await);
                replies
            }
            Err(e) => vec![e.to_string()],
        }
    }

    fn read<F>(&self, room: &str, view: F) -> Vec<String>
    where
        F: FnOnce(&GameSession) -> String,
    {
        match self.store.get(room) {
            Some(session) => vec![view(&session.ledger)],
            None => vec![no_session_reply(&self.prefix)],
        }
    }

    async fn end(&mut self, room: &str) -> Vec<String> {
        let Some(session) = self.store.remove(room) else {
            return vec![no_session_reply(&self.prefix)];
        };
        let mut replies = self.close(session, FINAL_RESULTS_HEADER).await;
        replies.push(SESSION_ENDED.to_string());
        tracing::info!("[{room}] session ended");
        replies
    }

    /// Final P/L for a session leaving the store, plus its sheet results.
    async fn close(&self, session: RoomSession, header: &str) -> Vec<String> {
        let mut replies = Vec::new();
        if let Ok(pnl) = session.ledger.get_player_pnl(None) {
            replies.push(format!("{header}{pnl}"));
        }

        if let (Some(mirror), Some(sheet)) = (&self.mirror, &session.sheet) {
            if let Err(e) = mirror.finalize_session_sheet(sheet, &session.ledger).await {
                tracing::error!("Failed to finalize session sheet: {e}");
                replies.push(FINALIZE_WARNING.to_string());
            }
        }
        replies
    }

    /// Push the room's session to the spreadsheet. A session without a
    /// sheet (first sync, or creation failed earlier) gets one now.
    /// Returns a warning reply on failure.
    async fn sync(&mut self, room: &str) -> Option<String> {
        let mirror = self.mirror.as_ref()?;
        let session = self.store.get_mut(room)?;

        let result = match session.sheet.clone() {
            Some(sheet) => mirror.update_session_sheet(&sheet, &session.ledger).await,
            None => mirror
                .create_session_sheet(&session.ledger)
                .await
                .map(|sheet| session.sheet = Some(sheet)),
        };

        match result {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("[{room}] spreadsheet sync failed: {e}");
                Some(SYNC_WARNING.to_string())
            }
        }
    }
}
