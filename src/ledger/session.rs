// src/ledger/session.rs — GameSession: buy-ins, roster, winners, P/L
//
// One session per chat room. Every operation either fully applies or
// returns an error with the state untouched.

use chrono::{Local, NaiveDate};

use crate::ledger::error::LedgerError;
use crate::ledger::format::{money, rule, signed_money};
use crate::ledger::types::{EventRecord, EventType, FinalResult, PlayerStats, SessionInfo};

/// History of one player who has been part of the session at some point.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub total_winnings: f64,
    pub win_count: u32,
    /// Game index at which the player (re)joined
    pub join_game: u32,
    /// Game index at which the player left; `None` while active
    pub leave_game: Option<u32>,
}

impl PlayerRecord {
    fn new(name: &str, join_game: u32) -> Self {
        Self {
            name: name.to_string(),
            total_winnings: 0.0,
            win_count: 0,
            join_game,
            leave_game: None,
        }
    }
}

/// State of one poker session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    date: NaiveDate,
    buy_in: f64,
    game_count: u32,
    initial_players: Vec<String>,
    /// Active players and their current stack, in seating order
    active_players: Vec<(String, f64)>,
    /// Everyone ever seen, in first-seen order
    players: Vec<PlayerRecord>,
    events: Vec<EventRecord>,
}

impl GameSession {
    /// Start a session. `date` defaults to today.
    pub fn new<S: AsRef<str>>(
        buy_in: f64,
        players: &[S],
        date: Option<NaiveDate>,
    ) -> Result<Self, LedgerError> {
        if !buy_in.is_finite() || buy_in <= 0.0 {
            return Err(LedgerError::InvalidAmount(buy_in.to_string()));
        }
        if players.is_empty() {
            return Err(LedgerError::NoPlayers);
        }

        let mut session = Self {
            date: date.unwrap_or_else(|| Local::now().date_naive()),
            buy_in,
            game_count: 1,
            initial_players: Vec::with_capacity(players.len()),
            active_players: Vec::with_capacity(players.len()),
            players: Vec::with_capacity(players.len()),
            events: Vec::new(),
        };

        for name in players {
            let name = name.as_ref();
            if session.record_index(name).is_some() {
                return Err(LedgerError::DuplicatePlayer(name.to_string()));
            }
            session.initial_players.push(name.to_string());
            session.active_players.push((name.to_string(), buy_in));
            session.players.push(PlayerRecord::new(name, 1));
            session.push_event(EventType::Join, name, "Initial", buy_in);
        }

        Ok(session)
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn buy_in(&self) -> f64 {
        self.buy_in
    }

    /// Index of the game currently in progress (1-based).
    pub fn game_count(&self) -> u32 {
        self.game_count
    }

    pub fn initial_players(&self) -> &[String] {
        &self.initial_players
    }

    pub fn active_players(&self) -> impl Iterator<Item = (&str, f64)> {
        self.active_players.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn active_count(&self) -> usize {
        self.active_players.len()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_index(name).is_some()
    }

    pub fn stack(&self, name: &str) -> Option<f64> {
        self.active_index(name).map(|i| self.active_players[i].1)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.record_index(name).map(|i| &self.players[i])
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Full buy-in times the number of active players.
    pub fn prize_pool(&self) -> f64 {
        self.buy_in * self.active_players.len() as f64
    }

    pub fn games_played(&self, name: &str) -> Option<u32> {
        self.player(name).map(|r| self.games_played_by(r))
    }

    // ─── Mutations ──────────────────────────────────────────────────────

    /// Seat a player with a fresh buy-in. A returning player keeps their history.
    pub fn add_player(&mut self, name: &str) -> Result<String, LedgerError> {
        if self.is_active(name) {
            return Err(LedgerError::AlreadyActive(name.to_string()));
        }

        let game = self.game_count;
        match self.record_index(name) {
            Some(i) => {
                let record = &mut self.players[i];
                record.join_game = game;
                record.leave_game = None;
            }
            None => self.players.push(PlayerRecord::new(name, game)),
        }
        self.active_players.push((name.to_string(), self.buy_in));
        self.push_event(EventType::In, name, "Joined", self.buy_in);

        tracing::debug!(player = name, game, "player joined");
        Ok(format!(
            "✅ {name} joined the game with {}\n💰 Current prize pool: {}",
            money(self.buy_in),
            money(self.prize_pool())
        ))
    }

    /// Take a player off the table, bookmarking the game they left at.
    pub fn remove_player(&mut self, name: &str) -> Result<String, LedgerError> {
        let pos = self
            .active_index(name)
            .ok_or_else(|| LedgerError::NotActive(name.to_string()))?;

        let (_, stack) = self.active_players.remove(pos);
        let game = self.game_count;
        if let Some(i) = self.record_index(name) {
            self.players[i].leave_game = Some(game);
        }
        self.push_event(EventType::Out, name, "Left", stack);

        tracing::debug!(player = name, game, "player left");
        Ok(format!(
            "👋 {name} left the game with {}\n💰 Current prize pool: {}",
            money(stack),
            money(self.prize_pool())
        ))
    }

    /// Award the pool to `name`, close the current game and open the next one.
    pub fn set_winner(&mut self, name: &str) -> Result<String, LedgerError> {
        if !self.is_active(name) {
            return Err(LedgerError::NotActive(name.to_string()));
        }
        let idx = self
            .record_index(name)
            .ok_or_else(|| LedgerError::NotActive(name.to_string()))?;

        let pool = self.prize_pool();
        let finished = self.game_count;

        let record = &mut self.players[idx];
        record.total_winnings += pool;
        record.win_count += 1;
        let wins = record.win_count;

        self.push_event(EventType::Win, name, &format!("Won Game #{finished}"), pool);

        self.game_count += 1;
        let next = self.game_count;
        let label = format!("Game #{next}");
        for i in 0..self.active_players.len() {
            self.active_players[i].1 = self.buy_in;
            let player = self.active_players[i].0.clone();
            self.push_event(EventType::NewGame, &player, &label, self.buy_in);
        }

        tracing::debug!(winner = name, game = finished, pool, "game won");
        Ok([
            format!("🏆 {name} won Game #{finished}!"),
            format!("💰 Prize pool: {}", money(pool)),
            format!("🥇 {name} has won {wins} game(s) this session"),
            String::new(),
            format!("🎲 Game #{next} has started automatically!"),
            format!("💵 All players reset to {}", money(self.buy_in)),
        ]
        .join("\n"))
    }

    // ─── Read models ────────────────────────────────────────────────────

    /// Profit/loss breakdown for one player, or everyone when `name` is `None`.
    pub fn get_player_pnl(&self, name: Option<&str>) -> Result<String, LedgerError> {
        if let Some(n) = name {
            if self.record_index(n).is_none() {
                return Err(LedgerError::NotFound(n.to_string()));
            }
        }

        let mut body = Vec::new();
        for record in self
            .players
            .iter()
            .filter(|r| name.is_none_or(|n| r.name == n))
        {
            let stats = self.stats_for(record);
            let status = match record.leave_game {
                None => "🟢 active".to_string(),
                Some(g) => format!("⚪ left at game #{g}"),
            };
            body.push(format!("{} ({status}):", record.name));
            body.push(format!("  Games Played: {}", stats.games_played));
            body.push(format!("  Games Won: {}", stats.games_won));
            body.push(format!("  Total Buy-in: {}", money(stats.total_buy_in)));
            body.push(format!("  Total Won: {}", money(stats.total_won)));
            body.push(format!("  Net P/L: {}", signed_money(stats.net)));
            body.push(rule(20));
        }

        if body.is_empty() {
            return Err(LedgerError::NoPlayersMatch);
        }

        let mut lines = vec![
            "📊 **Profit/Loss Summary**".to_string(),
            format!("Games played: {}", self.game_count - 1),
            rule(30),
        ];
        lines.extend(body);
        Ok(lines.join("\n"))
    }

    /// Aggregate stats for everyone ever seen, sorted by name.
    pub fn player_stats(&self) -> Vec<PlayerStats> {
        let mut stats: Vec<PlayerStats> = self.players.iter().map(|r| self.stats_for(r)).collect();
        stats.sort_by(|a, b| a.player.cmp(&b.player));
        stats
    }

    /// Single-game results: initial players, then later joiners still seated.
    pub fn get_final_results(&self) -> Vec<FinalResult> {
        let late_joiners = self
            .active_players
            .iter()
            .map(|(n, _)| n)
            .filter(|n| !self.initial_players.contains(*n));

        self.initial_players
            .iter()
            .chain(late_joiners)
            .map(|player| {
                let final_stack = self.stack(player).unwrap_or(0.0);
                FinalResult {
                    player: player.clone(),
                    buy_in: self.buy_in,
                    rebuys: 0,
                    final_stack,
                    net: final_stack - self.buy_in,
                }
            })
            .collect()
    }

    pub fn get_session_info(&self) -> SessionInfo {
        SessionInfo {
            date: self.date,
            buy_in: self.buy_in,
            initial_players: self.initial_players.clone(),
            current_game: self.game_count,
            total_pool: self.active_players.iter().map(|(_, s)| s).sum(),
        }
    }

    pub fn get_tracking_data(&self) -> &[EventRecord] {
        &self.events
    }

    /// Human-readable event log for chat.
    pub fn format_events(&self) -> String {
        if self.events.is_empty() {
            return "No events in current session".to_string();
        }

        let mut lines = vec![
            "📋 **Session Events**".to_string(),
            format!("Date: {}", self.date.format("%Y-%m-%d")),
            format!("Buy-in: {}", money(self.buy_in)),
            format!("Current Game: #{}", self.game_count),
            format!("Active Players: {}", self.active_players.len()),
            format!("Prize Pool: {}", money(self.prize_pool())),
            rule(40),
            String::new(),
        ];

        for ev in &self.events {
            lines.push(match ev.event_type {
                EventType::Join => format!("➡️ {} joined with {}", ev.player, money(ev.stack)),
                EventType::In => format!("✅ {} bought in with {}", ev.player, money(ev.stack)),
                EventType::Out => format!("❌ {} left the game", ev.player),
                EventType::Win => format!("🏆 {} {} with {}", ev.player, ev.action, money(ev.stack)),
                EventType::NewGame => format!(
                    "🎲 {} started for {} - stack reset to {}",
                    ev.action,
                    ev.player,
                    money(ev.stack)
                ),
            });
        }

        lines.join("\n")
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn active_index(&self, name: &str) -> Option<usize> {
        self.active_players.iter().position(|(n, _)| n == name)
    }

    fn record_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|r| r.name == name)
    }

    fn games_played_by(&self, record: &PlayerRecord) -> u32 {
        record
            .leave_game
            .unwrap_or(self.game_count)
            .saturating_sub(record.join_game)
    }

    fn stats_for(&self, record: &PlayerRecord) -> PlayerStats {
        let games_played = self.games_played_by(record);
        let total_buy_in = self.buy_in * games_played as f64;
        PlayerStats {
            player: record.name.clone(),
            games_played,
            games_won: record.win_count,
            total_buy_in,
            total_won: record.total_winnings,
            net: record.total_winnings - total_buy_in,
            active: record.leave_game.is_none(),
        }
    }

    fn push_event(&mut self, event_type: EventType, player: &str, action: &str, stack: f64) {
        self.events.push(EventRecord {
            date: self.date,
            event_type,
            player: player.to_string(),
            action: action.to_string(),
            stack,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn session(players: &[&str]) -> GameSession {
        GameSession::new(500.0, players, Some(day())).unwrap()
    }

    #[test]
    fn test_new_initializes_roster() {
        let s = session(&["A", "B", "C"]);
        assert_eq!(s.game_count(), 1);
        assert_eq!(s.date(), day());
        assert_eq!(s.active_count(), 3);
        assert_eq!(s.stack("B"), Some(500.0));
        assert_eq!(s.initial_players(), ["A", "B", "C"]);
        for p in s.players() {
            assert_eq!(p.total_winnings, 0.0);
            assert_eq!(p.win_count, 0);
            assert_eq!(p.join_game, 1);
            assert!(p.leave_game.is_none());
        }
        assert_eq!(s.events().len(), 3);
        assert!(s
            .events()
            .iter()
            .all(|e| e.event_type == EventType::Join && e.action == "Initial" && e.stack == 500.0));
    }

    #[test]
    fn test_new_rejects_bad_buy_in() {
        assert_eq!(
            GameSession::new(0.0, &["A"], None),
            Err(LedgerError::InvalidAmount("0".into()))
        );
        assert!(matches!(
            GameSession::new(-5.0, &["A"], None),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            GameSession::new(f64::NAN, &["A"], None),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_new_rejects_empty_and_duplicates() {
        let empty: [&str; 0] = [];
        assert_eq!(GameSession::new(10.0, &empty, None), Err(LedgerError::NoPlayers));
        assert_eq!(
            GameSession::new(10.0, &["A", "B", "A"], None),
            Err(LedgerError::DuplicatePlayer("A".into()))
        );
    }

    #[test]
    fn test_new_defaults_to_today() {
        let s = GameSession::new(10.0, &["A"], None).unwrap();
        assert_eq!(s.date(), Local::now().date_naive());
    }

    #[test]
    fn test_add_player_reports_pool() {
        let mut s = session(&["A", "B"]);
        let msg = s.add_player("C").unwrap();
        assert!(msg.contains("C joined the game with $500"));
        assert!(msg.contains("Current prize pool: $1500"));
        assert_eq!(s.stack("C"), Some(500.0));
        assert_eq!(s.player("C").unwrap().join_game, 1);
        assert_eq!(s.events().last().unwrap().event_type, EventType::In);
        assert_eq!(s.events().last().unwrap().action, "Joined");
    }

    #[test]
    fn test_add_duplicate_leaves_state() {
        let mut s = session(&["A", "B"]);
        let before = s.clone();
        let err = s.add_player("A").unwrap_err();
        assert_eq!(err, LedgerError::AlreadyActive("A".into()));
        assert_eq!(err.to_string(), "❌ A is already in the game");
        assert_eq!(s, before);
    }

    #[test]
    fn test_remove_player_bookmarks_leave() {
        let mut s = session(&["A", "B", "C"]);
        s.set_winner("A").unwrap();
        let msg = s.remove_player("B").unwrap();
        assert!(msg.contains("B left the game with $500"));
        assert!(msg.contains("Current prize pool: $1000"));
        assert!(!s.is_active("B"));
        assert_eq!(s.player("B").unwrap().leave_game, Some(2));
        let last = s.events().last().unwrap();
        assert_eq!(last.event_type, EventType::Out);
        assert_eq!(last.stack, 500.0);
    }

    #[test]
    fn test_remove_unknown_fails() {
        let mut s = session(&["A"]);
        let before = s.clone();
        assert_eq!(
            s.remove_player("Z"),
            Err(LedgerError::NotActive("Z".into()))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_rejoin_preserves_history() {
        let mut s = session(&["A", "B"]);
        s.set_winner("B").unwrap();
        s.remove_player("B").unwrap();
        s.set_winner("A").unwrap();
        s.add_player("B").unwrap();

        let b = s.player("B").unwrap();
        assert_eq!(b.total_winnings, 1000.0);
        assert_eq!(b.win_count, 1);
        assert_eq!(b.join_game, 3);
        assert!(b.leave_game.is_none());
        assert_eq!(s.games_played("B"), Some(0));
        // first-seen order is kept for history, seating order for the table
        assert_eq!(s.players()[1].name, "B");
        let seated: Vec<&str> = s.active_players().map(|(n, _)| n).collect();
        assert_eq!(seated, ["A", "B"]);
    }

    #[test]
    fn test_set_winner_awards_pool_and_resets() {
        let mut s = session(&["A", "B", "C"]);
        let events_before = s.events().len();
        let msg = s.set_winner("A").unwrap();

        let a = s.player("A").unwrap();
        assert_eq!(a.total_winnings, 1500.0);
        assert_eq!(a.win_count, 1);
        assert_eq!(s.game_count(), 2);
        assert!(s.active_players().all(|(_, stack)| stack == 500.0));

        let new_events = &s.events()[events_before..];
        assert_eq!(new_events.len(), 4);
        assert_eq!(new_events[0].event_type, EventType::Win);
        assert_eq!(new_events[0].action, "Won Game #1");
        assert_eq!(new_events[0].stack, 1500.0);
        assert!(new_events[1..]
            .iter()
            .all(|e| e.event_type == EventType::NewGame && e.action == "Game #2"));

        assert!(msg.contains("A won Game #1!"));
        assert!(msg.contains("Prize pool: $1500"));
        assert!(msg.contains("Game #2 has started automatically!"));
    }

    #[test]
    fn test_set_winner_inactive_fails() {
        let mut s = session(&["A", "B"]);
        s.remove_player("B").unwrap();
        let before = s.clone();
        assert_eq!(s.set_winner("B"), Err(LedgerError::NotActive("B".into())));
        assert_eq!(s, before);
    }

    #[test]
    fn test_pnl_single_player() {
        let mut s = session(&["A", "B", "C"]);
        s.set_winner("A").unwrap();
        let text = s.get_player_pnl(Some("A")).unwrap();
        assert!(text.contains("Games played: 1"));
        assert!(text.contains("A (🟢 active):"));
        assert!(text.contains("Total Buy-in: $500"));
        assert!(text.contains("Total Won: $1500"));
        assert!(text.contains("Net P/L: +$1000"));
        assert!(!text.contains("B ("));
    }

    #[test]
    fn test_pnl_all_players_marks_left() {
        let mut s = session(&["A", "B"]);
        s.set_winner("A").unwrap();
        s.remove_player("B").unwrap();
        let text = s.get_player_pnl(None).unwrap();
        assert!(text.contains("B (⚪ left at game #2):"));
        assert!(text.contains("Net P/L: -$500"));
    }

    #[test]
    fn test_pnl_unknown_player() {
        let s = session(&["A"]);
        assert_eq!(
            s.get_player_pnl(Some("nobody")),
            Err(LedgerError::NotFound("nobody".into()))
        );
    }

    #[test]
    fn test_player_stats_sorted() {
        let mut s = session(&["Zed", "Amy"]);
        s.set_winner("Zed").unwrap();
        let stats = s.player_stats();
        assert_eq!(stats[0].player, "Amy");
        assert_eq!(stats[1].player, "Zed");
        assert_eq!(stats[1].games_won, 1);
        assert_eq!(stats[1].net, 500.0);
        assert_eq!(stats[0].net, -500.0);
    }

    #[test]
    fn test_final_results_include_late_joiners() {
        let mut s = session(&["A", "B"]);
        s.remove_player("B").unwrap();
        s.add_player("C").unwrap();
        let results = s.get_final_results();
        let names: Vec<&str> = results.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(results[1].final_stack, 0.0);
        assert_eq!(results[1].net, -500.0);
        assert_eq!(results[0].net, 0.0);
        assert!(results.iter().all(|r| r.rebuys == 0));
    }

    #[test]
    fn test_session_info() {
        let mut s = session(&["A", "B"]);
        s.add_player("C").unwrap();
        let info = s.get_session_info();
        assert_eq!(info.buy_in, 500.0);
        assert_eq!(info.current_game, 1);
        assert_eq!(info.total_pool, 1500.0);
        assert_eq!(info.initial_players, ["A", "B"]);
    }

    #[test]
    fn test_format_events() {
        let mut s = session(&["A", "B"]);
        s.set_winner("B").unwrap();
        s.remove_player("A").unwrap();
        let text = s.format_events();
        assert!(text.starts_with("📋 **Session Events**"));
        assert!(text.contains("Date: 2026-10-19"));
        assert!(text.contains("Current Game: #2"));
        assert!(text.contains("➡️ A joined with $500"));
        assert!(text.contains("🏆 B Won Game #1 with $1000"));
        assert!(text.contains("❌ A left the game"));
        assert!(text.contains("🎲 Game #2 started for B - stack reset to $500"));
    }

    #[test]
    fn test_projections_are_pure() {
        let mut s = session(&["A", "B"]);
        s.set_winner("A").unwrap();
        let snapshot = s.clone();
        assert_eq!(s.format_events(), s.format_events());
        assert_eq!(s.get_tracking_data(), s.get_tracking_data());
        let _ = s.get_player_pnl(None);
        let _ = s.get_final_results();
        assert_eq!(s, snapshot);
    }
}
