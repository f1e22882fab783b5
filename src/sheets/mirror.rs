// src/sheets/mirror.rs — Mirrors a session into a spreadsheet tab
//
// Each session gets its own tab. Writes overwrite whole blocks, so a
// failed sync is repaired by the next successful one.

use std::sync::Arc;

use crate::infra::errors::PokerPalError;
use crate::integrations::types::{CellValue, SpreadsheetAdapter};
use crate::ledger::GameSession;
use crate::sheets::layout::{self, EVENTS_FIRST_ROW, EVENTS_HEADER_ROW, SESSION_INFO_RANGE};

/// Writes session state into one spreadsheet.
pub struct SheetMirror {
    adapter: Arc<dyn SpreadsheetAdapter>,
    spreadsheet_id: String,
    rows: u32,
    columns: u32,
}

impl SheetMirror {
    pub fn new(
        adapter: Arc<dyn SpreadsheetAdapter>,
        spreadsheet_id: impl Into<String>,
        rows: u32,
        columns: u32,
    ) -> Self {
        Self {
            adapter,
            spreadsheet_id: spreadsheet_id.into(),
            rows,
            columns,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Add a tab for a new session and write its initial state.
    /// Returns the tab name.
    pub async fn create_session_sheet(&self, session: &GameSession) -> Result<String, PokerPalError> {
        let base = format!("Session_{}", session.date());
        let existing = self
            .adapter
            .sheet_titles(&self.spreadsheet_id)
            .await
            .map_err(|e| sync_error(&base, e))?;

        let sheet = layout::unique_sheet_name(session.date(), &existing);
        tracing::info!("Creating session sheet {sheet}");

        let rows = grown_rows(self.rows, layout::last_used_row(session).max(self.rows));
        self.adapter
            .add_sheet(&self.spreadsheet_id, &sheet, rows, self.columns)
            .await
            .map_err(|e| sync_error(&sheet, e))?;

        let header_range = layout::sheet_range(
            &sheet,
            &format!("A{EVENTS_HEADER_ROW}:E{EVENTS_HEADER_ROW}"),
        );
        self.write(&sheet, &header_range, layout::event_header_row())
            .await?;
        self.write_state(&sheet, session).await?;

        tracing::info!("Session sheet {sheet} ready");
        Ok(sheet)
    }

    /// Rewrite session info, player stats and the event log.
    pub async fn update_session_sheet(
        &self,
        sheet: &str,
        session: &GameSession,
    ) -> Result<(), PokerPalError> {
        let last_row = layout::last_used_row(session);
        if last_row > self.rows {
            self.adapter
                .ensure_rows(&self.spreadsheet_id, sheet, grown_rows(self.rows, last_row))
                .await
                .map_err(|e| sync_error(sheet, e))?;
        }

        let events_range = layout::sheet_range(
            sheet,
            &format!(
                "A{EVENTS_FIRST_ROW}:E{}",
                self.rows.max(last_row).max(EVENTS_FIRST_ROW)
            ),
        );
        self.adapter
            .clear_values(&self.spreadsheet_id, &events_range)
            .await
            .map_err(|e| sync_error(sheet, e))?;

        self.write_state(sheet, session).await?;
        tracing::debug!("Session sheet {sheet} updated");
        Ok(())
    }

    /// Final update plus the single-game results table below the events.
    pub async fn finalize_session_sheet(
        &self,
        sheet: &str,
        session: &GameSession,
    ) -> Result<(), PokerPalError> {
        self.update_session_sheet(sheet, session).await?;

        let rows = layout::final_result_rows(&session.get_final_results());
        let start = layout::results_header_row(session.get_tracking_data().len());
        let end = start + rows.len() as u32 - 1;
        let range = layout::sheet_range(sheet, &format!("A{start}:E{end}"));
        self.write(sheet, &range, rows).await?;

        tracing::info!("Finalized session sheet {sheet}");
        Ok(())
    }

    async fn write_state(&self, sheet: &str, session: &GameSession) -> Result<(), PokerPalError> {
        let info_range = layout::sheet_range(sheet, SESSION_INFO_RANGE);
        self.write(sheet, &info_range, layout::session_info_rows(session))
            .await?;

        let stats = layout::player_stats_rows(session);
        let stats_range = layout::player_stats_range(sheet, &stats);
        self.write(sheet, &stats_range, stats).await?;

        let events = layout::event_rows(session.get_tracking_data());
        if !events.is_empty() {
            let last = EVENTS_FIRST_ROW + events.len() as u32 - 1;
            let range = layout::sheet_range(sheet, &format!("A{EVENTS_FIRST_ROW}:E{last}"));
            self.write(sheet, &range, events).await?;
        }
        Ok(())
    }

    async fn write(
        &self,
        sheet: &str,
        range: &str,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<(), PokerPalError> {
        self.adapter
            .update_values(&self.spreadsheet_id, range, &rows)
            .await
            .map_err(|e| sync_error(sheet, e))
    }
}

/// Grid size covering `last_row`, in whole multiples of the initial size.
fn grown_rows(initial: u32, last_row: u32) -> u32 {
    let step = initial.max(1);
    last_row.div_ceil(step) * step
}

fn sync_error(sheet: &str, err: anyhow::Error) -> PokerPalError {
    PokerPalError::SheetSync {
        sheet: sheet.to_string(),
        message: format!("{err:#}"),
    }
}
