// =============================================================================
// GOOGLE SHEETS VALUES CLIENT
// =============================================================================
//
// Reads a cell range through the Sheets API v4 `values.get` endpoint:
//
//   GET https://sheets.googleapis.com/v4/spreadsheets/{id}/values/{range}
//
// Private sheets need a bearer token (service account or authorized user,
// see `google_auth.rs`). Sheets shared as "Anyone with the link can view"
// also work with a plain API key.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::google_auth::TokenProvider;
use crate::core::monsters::{ExportError, SheetGrid, SheetLocation, SheetSource};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

/// How requests to the Sheets API are authorized.
pub enum SheetsCredentials {
    /// Bearer token from a service account or a stored user token.
    Token(Box<dyn TokenProvider>),
    /// API key, only valid for publicly shared sheets.
    ApiKey(String),
}

/// Response body of `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    /// Absent when the range is empty.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Renders one cell as text. The API returns formatted strings by default,
/// but unformatted values can come back as numbers or booleans.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn into_grid(range: ValueRange) -> SheetGrid {
    range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect()
}

/// Client for reading spreadsheet ranges.
pub struct GoogleSheetsClient {
    client: Client,
    base_url: String,
    credentials: SheetsCredentials,
}

impl GoogleSheetsClient {
    pub fn new(credentials: SheetsCredentials) -> Self {
        Self {
            client: Client::new(),
            base_url: SHEETS_API_BASE.to_string(),
            credentials,
        }
    }

    /// Extracts the spreadsheet ID from a Google Sheets URL, or accepts a bare ID.
    pub fn extract_spreadsheet_id(url_or_id: &str) -> Option<String> {
        let url_or_id = url_or_id.trim();
        if url_or_id.contains("docs.google.com") {
            if let Some(start) = url_or_id.find("/spreadsheets/d/") {
                let after_d = &url_or_id[start + "/spreadsheets/d/".len()..];
                let end = after_d
                    .find(|c: char| c == '/' || c == '?' || c == '#')
                    .unwrap_or(after_d.len());
                let id = &after_d[..end];
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        } else if !url_or_id.is_empty() && !url_or_id.contains('/') && !url_or_id.contains(' ') {
            return Some(url_or_id.to_string());
        }
        None
    }

    /// Builds the `values.get` URL. Path segments are percent-encoded, so
    /// ranges like `Monsters 2!A1:AA68` are safe.
    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, ExportError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ExportError::Fetch(format!("Invalid Sheets API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ExportError::Fetch("Sheets API base URL cannot be a base".to_string()))?
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn fetch_rows(&self, location: &SheetLocation) -> Result<SheetGrid, ExportError> {
        let spreadsheet_id = Self::extract_spreadsheet_id(&location.spreadsheet_id)
            .ok_or_else(|| {
                ExportError::Fetch(format!(
                    "Could not extract spreadsheet ID from: {}",
                    location.spreadsheet_id
                ))
            })?;

        let url = self.values_url(&spreadsheet_id, &location.range)?;

        let request = match &self.credentials {
            SheetsCredentials::Token(provider) => {
                let token = provider
                    .access_token()
                    .await
                    .map_err(|e| ExportError::Auth(e.to_string()))?;
                self.client.get(url).bearer_auth(token)
            }
            SheetsCredentials::ApiKey(key) => self.client.get(url).query(&[("key", key.as_str())]),
        };

        tracing::debug!("Fetching sheet range {} from {}", location.range, spreadsheet_id);

        let response = request
            .send()
            .await
            .map_err(|e| ExportError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ExportError::Fetch(format!(
                "Google Sheets API error ({}): {}. \
                 Make sure the sheet is shared with your service account email.",
                status, text
            )));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| ExportError::Fetch(format!("Unexpected response body: {}", e)))?;

        let grid = into_grid(range);
        if grid.is_empty() {
            tracing::warn!("No data found in range {}", location.range);
        }

        Ok(grid)
    }
}
