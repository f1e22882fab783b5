// tests/ledger_test.rs — Session ledger behaviour across whole poker nights

use chrono::NaiveDate;
use pokerpal::ledger::{EventType, GameSession, LedgerError};
use pretty_assertions::assert_eq;

fn night(buy_in: f64, players: &[&str]) -> GameSession {
    GameSession::new(buy_in, players, NaiveDate::from_ymd_opt(2026, 10, 16)).unwrap()
}

#[test]
fn test_create_initialises_every_player() {
    let s = night(250.0, &["A", "B", "C", "D"]);

    assert_eq!(s.game_count(), 1);
    assert_eq!(s.initial_players(), ["A", "B", "C", "D"]);
    for name in ["A", "B", "C", "D"] {
        assert_eq!(s.stack(name), Some(250.0));
        let record = s.player(name).unwrap();
        assert_eq!(record.total_winnings, 0.0);
        assert_eq!(record.win_count, 0);
        assert_eq!(record.join_game, 1);
        assert_eq!(record.leave_game, None);
    }

    let joins: Vec<&str> = s
        .events()
        .iter()
        .filter(|e| e.event_type == EventType::Join)
        .map(|e| e.player.as_str())
        .collect();
    assert_eq!(joins, ["A", "B", "C", "D"]);
    assert!(s.events().iter().all(|e| e.action == "Initial" && e.stack == 250.0));
}

#[test]
fn test_create_rejects_bad_input() {
    let date = None;
    assert_eq!(
        GameSession::new(0.0, &["A"], date).unwrap_err(),
        LedgerError::InvalidAmount("0".into())
    );
    assert_eq!(
        GameSession::new(100.0, &[] as &[&str], date).unwrap_err(),
        LedgerError::NoPlayers
    );
    assert_eq!(
        GameSession::new(100.0, &["A", "B", "A"], date).unwrap_err(),
        LedgerError::DuplicatePlayer("A".into())
    );
}

#[test]
fn test_friday_night_scenario() {
    let mut s = night(500.0, &["A", "B", "C"]);

    let msg = s.set_winner("A").unwrap();
    assert!(msg.contains("💰 Prize pool: $1500"));
    assert_eq!(s.player("A").unwrap().total_winnings, 1500.0);
    assert_eq!(s.game_count(), 2);
    assert!(s.active_players().all(|(_, stack)| stack == 500.0));

    let msg = s.remove_player("B").unwrap();
    assert_eq!(
        msg,
        "👋 B left the game with $500\n💰 Current prize pool: $1000"
    );

    let pnl = s.get_player_pnl(Some("A")).unwrap();
    assert!(pnl.contains("  Games Played: 1"));
    assert!(pnl.contains("  Total Buy-in: $500"));
    assert!(pnl.contains("  Net P/L: +$1000"));
}

#[test]
fn test_leave_and_rejoin_keeps_history() {
    let mut s = night(100.0, &["A", "B"]);
    s.set_winner("B").unwrap();
    s.remove_player("B").unwrap();

    let record = s.player("B").unwrap();
    assert_eq!(record.leave_game, Some(2));
    assert_eq!(record.total_winnings, 200.0);
    assert_eq!(record.win_count, 1);

    s.set_winner("A").unwrap();
    s.add_player("B").unwrap();

    let record = s.player("B").unwrap();
    assert_eq!(record.leave_game, None);
    assert_eq!(record.join_game, 3);
    assert_eq!(record.total_winnings, 200.0);
    assert_eq!(record.win_count, 1);
    assert_eq!(s.stack("B"), Some(100.0));
}

#[test]
fn test_set_winner_deltas() {
    let mut s = night(40.0, &["A", "B", "C"]);
    s.add_player("D").unwrap();
    s.remove_player("C").unwrap();

    let before = s.player("D").unwrap().clone();
    let active_before = s.active_count();
    s.set_winner("D").unwrap();
    let after = s.player("D").unwrap();

    assert_eq!(after.win_count, before.win_count + 1);
    assert_eq!(after.total_winnings, before.total_winnings + 40.0 * active_before as f64);
    assert_eq!(s.game_count(), 2);
    assert!(s.active_players().all(|(_, stack)| stack == 40.0));

    let new_games = s
        .events()
        .iter()
        .filter(|e| e.event_type == EventType::NewGame)
        .count();
    assert_eq!(new_games, active_before);
}

#[test]
fn test_failures_leave_state_untouched() {
    let mut s = night(100.0, &["A", "B"]);
    let snapshot = s.clone();

    assert_eq!(s.add_player("A").unwrap_err(), LedgerError::AlreadyActive("A".into()));
    assert_eq!(s.remove_player("Z").unwrap_err(), LedgerError::NotActive("Z".into()));
    assert_eq!(s.set_winner("Z").unwrap_err(), LedgerError::NotActive("Z".into()));
    assert_eq!(s.get_player_pnl(Some("Z")).unwrap_err(), LedgerError::NotFound("Z".into()));

    assert_eq!(s, snapshot);
}

#[test]
fn test_winner_must_be_seated() {
    let mut s = night(100.0, &["A", "B"]);
    s.remove_player("B").unwrap();
    assert_eq!(s.set_winner("B").unwrap_err().to_string(), "❌ B is not in the game");
}

#[test]
fn test_projections_are_pure() {
    let mut s = night(100.0, &["A", "B"]);
    s.set_winner("A").unwrap();

    assert_eq!(s.format_events(), s.format_events());
    assert_eq!(s.get_tracking_data(), s.get_tracking_data());
    assert_eq!(s.get_tracking_data().len(), 5);
}

#[test]
fn test_final_results_vs_pnl() {
    let mut s = night(100.0, &["A", "B"]);
    s.set_winner("A").unwrap();
    s.add_player("C").unwrap();
    s.remove_player("B").unwrap();

    let results = s.get_final_results();
    let names: Vec<&str> = results.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(results[1].final_stack, 0.0);
    assert_eq!(results[1].net, -100.0);
    assert_eq!(results[0].net, 0.0);
    assert!(results.iter().all(|r| r.rebuys == 0));

    let stats = s.player_stats();
    let a = stats.iter().find(|p| p.player == "A").unwrap();
    assert_eq!(a.net, 100.0);
}

#[test]
fn test_pnl_header_counts_completed_games() {
    let mut s = night(10.0, &["A", "B"]);
    s.set_winner("A").unwrap();
    s.set_winner("A").unwrap();

    let pnl = s.get_player_pnl(None).unwrap();
    let mut lines = pnl.lines();
    assert_eq!(lines.next(), Some("📊 **Profit/Loss Summary**"));
    assert_eq!(lines.next(), Some("Games played: 2"));
    assert!(pnl.contains("B (🟢 active):"));
    assert!(pnl.contains("  Net P/L: -$20"));
}
