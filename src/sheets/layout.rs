// src/sheets/layout.rs — Cell layout of a session sheet
//
//   A1:B5    session info
//   A7:..11  player stats, one column per player
//   A13:E13  event header, events from row 14
//   final results two rows below the last event

use chrono::NaiveDate;

use crate::integrations::types::CellValue;
use crate::ledger::{EventRecord, FinalResult, GameSession};

pub const SESSION_INFO_RANGE: &str = "A1:B5";
pub const STATS_FIRST_ROW: u32 = 7;
pub const STATS_LAST_ROW: u32 = 11;
pub const EVENTS_HEADER_ROW: u32 = 13;
pub const EVENTS_FIRST_ROW: u32 = 14;

const EVENT_HEADER: [&str; 5] = ["Date", "Event Type", "Player Name", "Action", "Current Stack"];
const RESULTS_HEADER: [&str; 5] = ["Player Name", "Buy-in", "Rebuys", "Final Stack", "Net Profit/Loss"];

/// First free name of the form `Session_<date>`, `Session_<date>_2`, ...
pub fn unique_sheet_name(date: NaiveDate, existing: &[String]) -> String {
    let base = format!("Session_{date}");
    let mut name = base.clone();
    let mut counter = 1;
    while existing.iter().any(|e| *e == name) {
        counter += 1;
        name = format!("{base}_{counter}");
    }
    name
}

/// A1 range on a named sheet, e.g. `'Session_2026-10-19'!A1:B5`.
pub fn sheet_range(sheet: &str, cells: &str) -> String {
    format!("'{}'!{cells}", sheet.replace('\'', "''"))
}

/// Column letters for a 1-based column index (1 → A, 27 → AA).
pub fn column_letter(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

pub fn session_info_rows(session: &GameSession) -> Vec<Vec<CellValue>> {
    let info = session.get_session_info();
    vec![
        vec!["Date".into(), info.date.to_string().into()],
        vec!["Buy-in Amount".into(), info.buy_in.into()],
        vec!["Initial Players".into(), info.initial_players_label().into()],
        vec!["Current Game".into(), info.current_game_label().into()],
        vec!["Total Pool".into(), info.total_pool.into()],
    ]
}

/// Player stats block: a header row of names, then one row per metric.
pub fn player_stats_rows(session: &GameSession) -> Vec<Vec<CellValue>> {
    let stats = session.player_stats();

    let mut header: Vec<CellValue> = vec!["Games in Session".into(), CellValue::Empty];
    let mut played: Vec<CellValue> = vec![
        "Games Played".into(),
        session.game_count().saturating_sub(1).into(),
    ];
    let mut won: Vec<CellValue> = vec!["Games Won".into(), CellValue::Empty];
    let mut buy_in: Vec<CellValue> = vec!["Total Buy-in".into(), CellValue::Empty];
    let mut net: Vec<CellValue> = vec!["Net P/L".into(), CellValue::Empty];

    for s in stats {
        header.push(s.player.into());
        played.push(s.games_played.into());
        won.push(s.games_won.into());
        buy_in.push(s.total_buy_in.into());
        net.push(s.net.into());
    }

    vec![header, played, won, buy_in, net]
}

/// Range covering the stats block for `rows`.
pub fn player_stats_range(sheet: &str, rows: &[Vec<CellValue>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(1) as u32;
    sheet_range(
        sheet,
        &format!(
            "A{STATS_FIRST_ROW}:{}{STATS_LAST_ROW}",
            column_letter(width)
        ),
    )
}

pub fn event_header_row() -> Vec<Vec<CellValue>> {
    vec![EVENT_HEADER.iter().map(|h| CellValue::from(*h)).collect()]
}

pub fn event_rows(events: &[EventRecord]) -> Vec<Vec<CellValue>> {
    events
        .iter()
        .map(|e| {
            vec![
                e.date.to_string().into(),
                e.event_type.as_str().into(),
                e.player.as_str().into(),
                e.action.as_str().into(),
                e.stack.into(),
            ]
        })
        .collect()
}

/// Row of the final results header for a log of `event_count` events.
pub fn results_header_row(event_count: usize) -> u32 {
    EVENTS_HEADER_ROW + event_count as u32 + 2
}

/// Last row the session reaches once its final results are written.
pub fn last_used_row(session: &GameSession) -> u32 {
    let results = session.players().len() as u32;
    results_header_row(session.get_tracking_data().len()) + results
}

/// Header plus one row per result.
pub fn final_result_rows(results: &[FinalResult]) -> Vec<Vec<CellValue>> {
    let mut rows: Vec<Vec<CellValue>> =
        vec![RESULTS_HEADER.iter().map(|h| CellValue::from(*h)).collect()];
    rows.extend(results.iter().map(|r| {
        vec![
            r.player.as_str().into(),
            r.buy_in.into(),
            r.rebuys.into(),
            r.final_stack.into(),
            r.net.into(),
        ]
    }));
    rows
}
