use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, error};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::cell::RefCell;
use std::time::Duration;
use url::Url;

use super::HistoryStore;
use crate::auth::{get_access_token, AccessToken, ServiceAccountKey};
use crate::common::constants::{HISTORY_COLUMNS, USER_AGENT};
use crate::common::{StoreError, UtmRecord};
use crate::settings::SheetsSettings;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// History kept in a Google Sheets worksheet, one row per link.
pub struct SheetsStore {
    client: Client,
    api_base: Url,
    spreadsheet_id: String,
    worksheet: String,
    key: ServiceAccountKey,
    token: RefCell<Option<AccessToken>>,
}

impl SheetsStore {
    pub fn new(
        settings: &SheetsSettings,
        key: ServiceAccountKey,
        timeout_secs: u64,
    ) -> Result<Self> {
        let api_base = Url::parse(&settings.api_base_url)
            .with_context(|| format!("Invalid Sheets API base URL: {}", settings.api_base_url))?;
        if api_base.cannot_be_a_base() {
            return Err(anyhow::anyhow!(
                "Sheets API base URL cannot carry a path: {}",
                settings.api_base_url
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base,
            spreadsheet_id: settings.spreadsheet_id.clone(),
            worksheet: settings.worksheet.clone(),
            key,
            token: RefCell::new(None),
        })
    }

    fn values_url(&self, suffix: &str) -> Result<Url, StoreError> {
        let range = format!("{}{}", a1_range(&self.worksheet), suffix);
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Malformed("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                range.as_str(),
            ]);
        Ok(url)
    }

    fn bearer(&self) -> Result<String, StoreError> {
        let now = Utc::now().timestamp();
        if let Some(token) = self.token.borrow().as_ref() {
            if token.is_fresh(now) {
                return Ok(token.value.clone());
            }
        }

        debug!("Access token missing or stale, requesting a new one");
        let fresh = get_access_token(&self.client, &self.key)?;
        let value = fresh.value.clone();
        *self.token.borrow_mut() = Some(fresh);
        Ok(value)
    }

    fn forget_token(&self) {
        self.token.borrow_mut().take();
    }

    fn check_status(&self, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        error!("Sheets API request failed with status: {}", status);
        if status.as_u16() == 401 || status.as_u16() == 403 {
            self.forget_token();
            return Err(StoreError::Auth(format!("{}: {}", status, body)));
        }
        Err(StoreError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

impl HistoryStore for SheetsStore {
    fn append(&mut self, record: &UtmRecord) -> Result<(), StoreError> {
        let mut url = self.values_url(":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.bearer()?;
        debug!("Appending row to {}", self.describe());
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [record.to_row()] }))
            .send()?;
        self.check_status(response)?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<UtmRecord>, StoreError> {
        let url = self.values_url("")?;
        let token = self.bearer()?;

        debug!("Fetching rows from {}", self.describe());
        let response = self.client.get(url).bearer_auth(token).send()?;
        let response = self.check_status(response)?;

        let range: ValueRange = response
            .json()
            .map_err(|e| StoreError::Malformed(format!("values response: {}", e)))?;
        debug!("Received {} raw rows", range.values.len());
        Ok(rows_to_records(&range.values))
    }

    fn describe(&self) -> String {
        format!("spreadsheet {} / {}", self.spreadsheet_id, self.worksheet)
    }
}

/// A1 range covering the history columns. The worksheet name is always
/// quoted so names with spaces or punctuation resolve; quotes inside it
/// are doubled.
fn a1_range(worksheet: &str) -> String {
    format!("'{}'!A:G", worksheet.replace('\'', "''"))
}

fn is_header_row(row: &[String]) -> bool {
    row.first()
        .map(|cell| cell.trim().eq_ignore_ascii_case(HISTORY_COLUMNS[0]))
        .unwrap_or(false)
}

/// Decodes worksheet rows. A leading header row maps cells by column name;
/// without one, cells are read positionally. Blank rows are skipped.
pub fn rows_to_records(rows: &[Vec<String>]) -> Vec<UtmRecord> {
    let (columns, data) = match rows.split_first() {
        Some((first, rest)) if is_header_row(first) => {
            let positions: Vec<Option<usize>> = HISTORY_COLUMNS
                .iter()
                .map(|name| {
                    first
                        .iter()
                        .position(|cell| cell.trim().eq_ignore_ascii_case(name))
                })
                .collect();
            (Some(positions), rest)
        }
        _ => (None, rows),
    };

    data.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| match &columns {
            Some(positions) => {
                let ordered: Vec<String> = positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect();
                UtmRecord::from_row(&ordered)
            }
            None => UtmRecord::from_row(row),
        })
        .collect()
}
