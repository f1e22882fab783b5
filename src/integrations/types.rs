// src/integrations/types.rs — Integration adapter traits

use async_trait::async_trait;

/// An incoming message from a messaging integration.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: String,
    pub channel: String,
    pub sender: String,
    pub content: String,
    pub timestamp: String,
}

/// A cell written to a spreadsheet. Numbers stay numeric in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Number(n) => serde_json::json!(n),
            CellValue::Empty => serde_json::Value::String(String::new()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

/// Adapter for chat apps (Discord, RocketChat).
#[async_trait]
pub trait MessagingAdapter: Send + Sync {
    /// Post `content` to a channel; returns the platform message ID.
    async fn send(&self, target: &str, content: &str) -> anyhow::Result<String>;

    /// Most recent messages of a channel, oldest first.
    async fn history(&self, channel: &str, limit: u32) -> anyhow::Result<Vec<IncomingMessage>>;

    /// Longest message body the platform accepts.
    fn max_message_len(&self) -> usize {
        4000
    }
}

/// Adapter for tabular stores (Google Sheets).
#[async_trait]
pub trait SpreadsheetAdapter: Send + Sync {
    /// Titles of all tabs in the spreadsheet.
    async fn sheet_titles(&self, spreadsheet_id: &str) -> anyhow::Result<Vec<String>>;

    /// Add a tab; returns its numeric sheet ID.
    async fn add_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> anyhow::Result<i64>;

    /// Overwrite an A1 range with rows of values.
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<CellValue>],
    ) -> anyhow::Result<()>;

    /// Clear the values of an A1 range.
    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> anyhow::Result<()>;

    /// Grow the tab `title` to at least `rows` rows. Never shrinks it.
    async fn ensure_rows(&self, spreadsheet_id: &str, title: &str, rows: u32) -> anyhow::Result<()>;
}

/// A chat integration registered with the bot.
pub trait Integration: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn messaging(&self) -> Option<&dyn MessagingAdapter>;
}
