//! HTTP client for the spreadsheet values API
//!
//! Implements the store primitives against a Sheets-style REST surface:
//!
//! - `GET  {base}/{id}/values/{range}` reads (unformatted values)
//! - `PUT  {base}/{id}/values/{range}` overwrites (raw input)
//! - `POST {base}/{id}/values:batchUpdate` writes disjoint ranges
//! - `GET  {base}/{id}?fields=sheets.properties.title` lists tab titles
//!
//! The service is eventually consistent: a read immediately after a write may
//! return the previous contents. Nothing here compensates for that.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{RangeSpec, RawRow, StoreError, StoreResult, TabularStore, is_blank};

/// Spreadsheet service client
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<RawRow>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

impl SheetsClient {
    /// Create a client against `base_url` with a bearer `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn values_url(&self, store_id: &str, range: &RangeSpec) -> String {
        format!("{}/{}/values/{}", self.base_url, store_id, range.a1())
    }

    async fn check(resp: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl TabularStore for SheetsClient {
    async fn read_range(&self, store_id: &str, range: &RangeSpec) -> StoreResult<Vec<RawRow>> {
        let resp = self
            .client
            .get(self.values_url(store_id, range))
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let resp = Self::check(resp).await?;
        let range_data: ValueRange = resp
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(range_data.values)
    }

    async fn write_range(
        &self,
        store_id: &str,
        range: &RangeSpec,
        rows: Vec<RawRow>,
    ) -> StoreResult<()> {
        let resp = self
            .client
            .put(self.values_url(store_id, range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&json!({ "range": range.a1(), "values": rows }))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn append_rows(
        &self,
        store_id: &str,
        sheet: &str,
        rows: Vec<RawRow>,
    ) -> StoreResult<u32> {
        // Locate the last non-blank cell of column A. A concurrent append
        // landing between this read and the write below wins or loses the
        // rows; the caller accepts that (documented store race).
        let col_a = self
            .read_range(store_id, &RangeSpec::column(sheet, 1))
            .await?;

        let last_filled = col_a
            .iter()
            .rposition(|row| row.first().is_some_and(|c| !is_blank(c)))
            .map(|i| i as u32 + 1)
            .unwrap_or(0);

        let start_row = last_filled + 1;
        let end_row = start_row + (rows.len() as u32).saturating_sub(1);
        let range = RangeSpec::new(sheet, 1, start_row, super::SHEET_COLUMNS, Some(end_row));

        self.write_range(store_id, &range, rows).await?;
        Ok(start_row)
    }

    async fn batch_write(
        &self,
        store_id: &str,
        writes: Vec<(RangeSpec, Vec<RawRow>)>,
    ) -> StoreResult<()> {
        let data: Vec<_> = writes
            .iter()
            .map(|(range, rows)| json!({ "range": range.a1(), "values": rows }))
            .collect();

        let resp = self
            .client
            .post(format!("{}/{}/values:batchUpdate", self.base_url, store_id))
            .bearer_auth(&self.token)
            .json(&json!({ "valueInputOption": "RAW", "data": data }))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn list_sheets(&self, store_id: &str) -> StoreResult<Vec<String>> {
        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, store_id))
            .query(&[("fields", "sheets.properties.title")])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let resp = Self::check(resp).await?;
        let meta: SheetMeta = resp
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }
}
