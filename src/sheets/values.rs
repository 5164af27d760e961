//! Range reads, row appends and batch overwrites.

use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::Result;
use crate::rows::{Cell, Row};

use super::client::Access;
use super::{SheetsApi, ValueRange};

/// What an append call reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendResult {
    /// Range the new rows landed in, e.g. `Productos!A7:L7`
    pub updated_range: Option<String>,
    pub updated_rows: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_range: Option<String>,
    #[serde(default)]
    updated_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    total_updated_cells: Option<usize>,
}

/// Formatted cell value as text. Empty cells come back as "".
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetsApi {
    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    /// Reads every row of `range`. A range with no data yields no rows.
    pub async fn get_values(&self, session: &Session, range: &str) -> Result<Vec<Row>> {
        let url = self.values_url(range);
        debug!("Reading range {range} from {url}");

        let request = self.client.get(&url);
        let response = self.send(session, request, range, Access::Read).await?;

        let body = response
            .text()
            .await
            .map_err(|e| Access::Read.error(range, format!("failed to read body: {e}")))?;
        debug!("Read {} bytes for {range}", body.len());

        let parsed: ValueRange = serde_json::from_str(&body)
            .map_err(|e| Access::Read.error(range, format!("unexpected response: {e}")))?;

        let rows: Vec<Row> = parsed
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();

        info!("Read {} rows from {range}", rows.len());
        Ok(rows)
    }

    /// Appends `rows` after the last row of `range`.
    pub async fn append_rows(
        &self,
        session: &Session,
        range: &str,
        rows: Vec<Vec<Cell>>,
    ) -> Result<AppendResult> {
        let url = format!("{}:append", self.values_url(range));
        debug!("Appending {} rows to {range}", rows.len());

        let body = json!({ "values": rows });
        debug!(
            "Append payload: {}",
            serde_json::to_string(&body).unwrap_or_else(|_| "Failed to serialize".to_string())
        );

        let request = self
            .client
            .post(&url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body);
        let response = self.send(session, request, range, Access::Write).await?;

        let text = response.text().await.unwrap_or_default();
        debug!("Append response: {text}");

        // The rows are written once the status is 2xx; an odd body is not a failure.
        let result = serde_json::from_str::<AppendResponse>(&text)
            .ok()
            .and_then(|r| r.updates)
            .map(|u| AppendResult {
                updated_range: u.updated_range,
                updated_rows: u.updated_rows.unwrap_or(0),
            })
            .unwrap_or_default();

        info!("Appended to {range}: {result:?}");
        Ok(result)
    }

    /// Overwrites each `(range, rows)` pair in a single request.
    ///
    /// Entries are applied in order, so a later entry for the same range wins.
    pub async fn batch_update(
        &self,
        session: &Session,
        data: Vec<(String, Vec<Vec<Cell>>)>,
    ) -> Result<usize> {
        if data.is_empty() {
            debug!("Nothing to update");
            return Ok(0);
        }

        let url = format!(
            "{}/spreadsheets/{}/values:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        let ranges: Vec<String> = data.iter().map(|(range, _)| range.clone()).collect();
        let label = ranges.join(",");
        debug!("Batch updating {} ranges: {label}", ranges.len());

        let body = json!({
            "valueInputOption": "USER_ENTERED",
            "data": data
                .into_iter()
                .map(|(range, values)| json!({ "range": range, "values": values }))
                .collect::<Vec<_>>(),
        });

        let request = self.client.post(&url).json(&body);
        let response = self.send(session, request, &label, Access::Write).await?;

        let text = response.text().await.unwrap_or_default();
        debug!("Batch update response: {text}");

        let cells = serde_json::from_str::<BatchUpdateResponse>(&text)
            .ok()
            .and_then(|r| r.total_updated_cells)
            .unwrap_or(0);

        info!("Batch update wrote {cells} cells");
        Ok(cells)
    }
}
