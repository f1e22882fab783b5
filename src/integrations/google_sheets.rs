// src/integrations/google_sheets.rs — Google Sheets adapter (REST API + OAuth2)
//
// Uses the Google Sheets API v4 (https://developers.google.com/sheets/api).
// The access token is refreshed with the stored refresh token whenever the
// API answers 401, and the request is retried once.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::integrations::types::{CellValue, SpreadsheetAdapter};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google Sheets integration adapter.
pub struct GoogleSheetsAdapter {
    client: Client,
    access_token: RwLock<String>,
    refresh_token: Option<String>,
    client_id: String,
    client_secret: String,
}

impl GoogleSheetsAdapter {
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            client: Client::new(),
            access_token: RwLock::new(access_token),
            refresh_token,
            client_id,
            client_secret,
        }
    }

    /// Refresh the access token using the refresh token.
    pub async fn refresh_access_token(&self) -> anyhow::Result<()> {
        let refresh = self
            .refresh_token
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No refresh token available"))?;

        #[derive(Deserialize)]
        struct TokenResp {
            access_token: String,
        }

        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh.as_str()),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Google token refresh returned {status}: {body}");
        }

        let token: TokenResp = resp.json().await?;
        *self.access_token.write().await = token.access_token;
        tracing::debug!("Google access token refreshed");
        Ok(())
    }

    /// Validate access by reading the spreadsheet's title.
    pub async fn validate(&self, spreadsheet_id: &str) -> anyhow::Result<String> {
        #[derive(Deserialize)]
        struct TitleResp {
            properties: Option<SpreadsheetProperties>,
        }

        let resp = self
            .execute(|token| {
                self.client
                    .get(format!("{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}"))
                    .bearer_auth(token)
                    .query(&[("fields", "properties.title")])
            })
            .await?;
        let resp = ensure_success(resp, "read spreadsheet").await?;
        let title: TitleResp = resp.json().await?;

        Ok(format!(
            "Google Sheets: spreadsheet \"{}\" is reachable",
            title
                .properties
                .and_then(|p| p.title)
                .unwrap_or_else(|| "Untitled".into())
        ))
    }

    /// Send a request, refreshing the token and retrying once on 401.
    async fn execute<F>(&self, build: F) -> anyhow::Result<Response>
    where
        F: Fn(&str) -> RequestBuilder + Send + Sync,
    {
        let token = self.access_token.read().await.clone();
        let resp = build(&token).send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED && self.refresh_token.is_some() {
            self.refresh_access_token().await?;
            let token = self.access_token.read().await.clone();
            return Ok(build(&token).send().await?);
        }

        Ok(resp)
    }
}

// -- Google Sheets API types --

#[derive(Deserialize)]
struct SpreadsheetResp {
    sheets: Option<Vec<SheetMeta>>,
}

#[derive(Deserialize)]
struct SpreadsheetProperties {
    title: Option<String>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: Option<SheetProperties>,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: Option<String>,
    #[serde(rename = "sheetId")]
    sheet_id: Option<i64>,
    #[serde(rename = "gridProperties")]
    grid_properties: Option<GridProperties>,
}

#[derive(Deserialize)]
struct GridProperties {
    #[serde(rename = "rowCount")]
    row_count: Option<u32>,
}

/// Sheet ID and number of rows to append so `title` has at least `rows`.
/// `None` when the tab is already big enough.
fn rows_to_append(
    spreadsheet: SpreadsheetResp,
    title: &str,
    rows: u32,
) -> anyhow::Result<Option<(i64, u32)>> {
    let props = spreadsheet
        .sheets
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.properties)
        .find(|p| p.title.as_deref() == Some(title))
        .ok_or_else(|| anyhow::anyhow!("Sheet '{title}' not found"))?;

    let sheet_id = props
        .sheet_id
        .ok_or_else(|| anyhow::anyhow!("Google Sheets returned no ID for sheet '{title}'"))?;
    let current = props
        .grid_properties
        .and_then(|g| g.row_count)
        .unwrap_or(0);

    Ok((current < rows).then(|| (sheet_id, rows - current)))
}

#[derive(Deserialize)]
struct BatchUpdateResp {
    #[serde(default)]
    replies: Vec<BatchReply>,
}

#[derive(Deserialize)]
struct BatchReply {
    #[serde(rename = "addSheet")]
    add_sheet: Option<SheetMeta>,
}

// -- SpreadsheetAdapter implementation --

#[async_trait]
impl SpreadsheetAdapter for GoogleSheetsAdapter {
    async fn sheet_titles(&self, spreadsheet_id: &str) -> anyhow::Result<Vec<String>> {
        let resp = self
            .execute(|token| {
                self.client
                    .get(format!("{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}"))
                    .bearer_auth(token)
                    .query(&[("fields", "sheets.properties.title")])
            })
            .await?;
        let resp = ensure_success(resp, "list sheets").await?;

        let spreadsheet: SpreadsheetResp = resp.json().await?;
        Ok(spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| s.properties.and_then(|p| p.title))
            .collect())
    }

    async fn add_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> anyhow::Result<i64> {
        let body = serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": rows,
                            "columnCount": columns,
                        }
                    }
                }
            }]
        });

        let resp = self
            .execute(|token| {
                self.client
                    .post(format!(
                        "{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}:batchUpdate"
                    ))
                    .bearer_auth(token)
                    .json(&body)
            })
            .await?;
        let resp = ensure_success(resp, "add sheet").await?;

        let update: BatchUpdateResp = resp.json().await?;
        update
            .replies
            .into_iter()
            .find_map(|r| r.add_sheet.and_then(|s| s.properties).and_then(|p| p.sheet_id))
            .ok_or_else(|| anyhow::anyhow!("Google Sheets did not return an ID for sheet '{title}'"))
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<CellValue>],
    ) -> anyhow::Result<()> {
        let values: Vec<Vec<serde_json::Value>> = rows
            .iter()
            .map(|row| row.iter().map(CellValue::to_json).collect())
            .collect();
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        let resp = self
            .execute(|token| {
                self.client
                    .put(format!(
                        "{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}/values/{}",
                        urlencoded(range)
                    ))
                    .bearer_auth(token)
                    .query(&[("valueInputOption", "RAW")])
                    .json(&body)
            })
            .await?;
        ensure_success(resp, "update values").await?;
        Ok(())
    }

    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> anyhow::Result<()> {
        let resp = self
            .execute(|token| {
                self.client
                    .post(format!(
                        "{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}/values/{}:clear",
                        urlencoded(range)
                    ))
                    .bearer_auth(token)
                    .json(&serde_json::json!({}))
            })
            .await?;
        ensure_success(resp, "clear values").await?;
        Ok(())
    }

    async fn ensure_rows(&self, spreadsheet_id: &str, title: &str, rows: u32) -> anyhow::Result<()> {
        let resp = self
            .execute(|token| {
                self.client
                    .get(format!("{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}"))
                    .bearer_auth(token)
                    .query(&[(
                        "fields",
                        "sheets.properties(sheetId,title,gridProperties.rowCount)",
                    )])
            })
            .await?;
        let resp = ensure_success(resp, "read grid size").await?;

        let Some((sheet_id, length)) = rows_to_append(resp.json().await?, title, rows)? else {
            return Ok(());
        };
        tracing::info!("Growing sheet {title} by {length} rows");

        let body = serde_json::json!({
            "requests": [{
                "appendDimension": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "length": length,
                }
            }]
        });
        let resp = self
            .execute(|token| {
                self.client
                    .post(format!(
                        "{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}:batchUpdate"
                    ))
                    .bearer_auth(token)
                    .json(&body)
            })
            .await?;
        ensure_success(resp, "append rows").await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_success(resp: Response, what: &str) -> anyhow::Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    anyhow::bail!("Google Sheets {what} returned {status}: {body}")
}

/// Simple URL encoding for A1 ranges.
fn urlencoded(s: &str) -> String {
    s.replace('%', "%25")
        .replace(' ', "%20")
        .replace('!', "%21")
        .replace('\'', "%27")
        .replace('#', "%23")
}
