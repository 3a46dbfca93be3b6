use std::sync::Arc;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::gateway::{AccessTokenProvider, GatewayError};
use crate::core::links::DocumentRef;
use crate::core::tabular::SheetTable;
use crate::infra::drive::check_status;

/// Row/column axis for dimension edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Rows,
    Columns,
}

impl Dimension {
    fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Columns => "COLUMNS",
        }
    }
}

/// A fetched block of cell values, as returned by `values.get`.
///
/// Trailing empty cells are omitted by the API, so rows may be ragged.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

fn insert_dimension_request(sheet_id: i64, dimension: Dimension, start_index: i64, count: i64) -> Value {
    json!({
        "insertDimension": {
            "range": {
                "sheetId": sheet_id,
                "dimension": dimension.as_str(),
                "startIndex": start_index,
                "endIndex": start_index + count,
            },
            "inheritFromBefore": true,
        }
    })
}

fn delete_dimension_request(sheet_id: i64, dimension: Dimension, start_index: i64, end_index: i64) -> Value {
    json!({
        "deleteDimension": {
            "range": {
                "sheetId": sheet_id,
                "dimension": dimension.as_str(),
                "startIndex": start_index,
                "endIndex": end_index,
            }
        }
    })
}

/// URL for a `…/values/<segment>` endpoint, percent-encoding the segment.
/// Sheet titles can carry characters like `#` or spaces that must not leak
/// into the raw path.
fn values_url(base_url: &str, spreadsheet_id: &str, segment: &str) -> Result<Url, GatewayError> {
    let mut url = Url::parse(base_url).map_err(GatewayError::transport)?;
    url.path_segments_mut()
        .map_err(|_| GatewayError::Shape("base url cannot hold path segments".to_string()))?
        .push(spreadsheet_id)
        .push("values")
        .push(segment);
    Ok(url)
}

/// Client for the Sheets v4 API.
pub struct SheetsClient {
    auth: Arc<dyn AccessTokenProvider>,
    client: Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new(auth: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            auth,
            client: Client::new(),
            base_url: "https://sheets.googleapis.com/v4/spreadsheets".to_string(),
        }
    }

    /// Title of the sheet at `sheet_index` within the spreadsheet, used to
    /// default the range when the caller doesn't name one.
    pub async fn sheet_title(
        &self,
        spreadsheet: &DocumentRef,
        sheet_index: usize,
    ) -> Result<String, GatewayError> {
        let id = spreadsheet.resolve()?;
        let token = self.auth.access_token().await?;

        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, id))
            .bearer_auth(&token)
            .query(&[("fields", "sheets.properties")])
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let meta: SpreadsheetMeta = resp.json().await.map_err(GatewayError::transport)?;
        meta.sheets
            .into_iter()
            .nth(sheet_index)
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| {
                GatewayError::Shape(format!("spreadsheet {} has no sheet at index {}", id, sheet_index))
            })
    }

    /// Fetches formatted cell values for a range.
    ///
    /// When `sheet_range` is `None` the whole sheet at `sheet_index` is
    /// fetched, addressed by its title.
    pub async fn get_values(
        &self,
        spreadsheet: &DocumentRef,
        sheet_range: Option<&str>,
        sheet_index: usize,
    ) -> Result<ValueRange, GatewayError> {
        let id = spreadsheet.resolve()?;

        let range = match sheet_range {
            Some(range) => range.to_string(),
            None => self.sheet_title(spreadsheet, sheet_index).await?,
        };

        let token = self.auth.access_token().await?;
        let resp = self
            .client
            .get(values_url(&self.base_url, &id, &range)?)
            .bearer_auth(&token)
            .query(&[("valueRenderOption", "FORMATTED_VALUE")])
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let values: ValueRange = resp.json().await.map_err(GatewayError::transport)?;
        tracing::info!("fetched range '{}' from spreadsheet {}", range, id);
        Ok(values)
    }

    /// Overwrites a cell range with the given rows of values.
    pub async fn update_values(
        &self,
        spreadsheet: &DocumentRef,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<Value, GatewayError> {
        let id = spreadsheet.resolve()?;
        let token = self.auth.access_token().await?;

        let resp = self
            .client
            .put(values_url(&self.base_url, &id, range)?)
            .bearer_auth(&token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": values }))
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let body: Value = resp.json().await.map_err(GatewayError::transport)?;
        tracing::info!("updated range '{}' in spreadsheet {}", range, id);
        Ok(body)
    }

    /// Appends the given rows after the last data row of the range's table.
    pub async fn append_values(
        &self,
        spreadsheet: &DocumentRef,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<Value, GatewayError> {
        let id = spreadsheet.resolve()?;
        let token = self.auth.access_token().await?;

        let resp = self
            .client
            .post(values_url(&self.base_url, &id, &format!("{}:append", range))?)
            .bearer_auth(&token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": values }))
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let body: Value = resp.json().await.map_err(GatewayError::transport)?;
        tracing::info!("appended {} row(s) to spreadsheet {}", values_len(&body), id);
        Ok(body)
    }

    /// Inserts `count` empty rows or columns starting at a 0-based index.
    pub async fn insert_dimension(
        &self,
        spreadsheet: &DocumentRef,
        sheet_id: i64,
        dimension: Dimension,
        start_index: i64,
        count: i64,
    ) -> Result<Value, GatewayError> {
        let request = insert_dimension_request(sheet_id, dimension, start_index, count);
        let body = self.batch_update(spreadsheet, vec![request]).await?;
        tracing::info!(
            "inserted {} {} at index {}",
            count,
            dimension.as_str().to_lowercase(),
            start_index
        );
        Ok(body)
    }

    /// Deletes rows or columns in `[start_index, end_index)` (0-based).
    /// A missing `end_index` deletes just the one row or column.
    pub async fn delete_dimension(
        &self,
        spreadsheet: &DocumentRef,
        sheet_id: i64,
        dimension: Dimension,
        start_index: i64,
        end_index: Option<i64>,
    ) -> Result<Value, GatewayError> {
        let end_index = end_index.unwrap_or(start_index + 1);
        let request = delete_dimension_request(sheet_id, dimension, start_index, end_index);
        let body = self.batch_update(spreadsheet, vec![request]).await?;
        tracing::info!(
            "deleted {} {}-{}",
            dimension.as_str().to_lowercase(),
            start_index,
            end_index
        );
        Ok(body)
    }

    /// Fetches a range and shapes it into a headered table.
    ///
    /// With `header_row = None` the headers are synthesized as column
    /// labels (A, B, C, …), matching how data without a header row is
    /// usually consumed downstream.
    pub async fn get_table(
        &self,
        spreadsheet: &DocumentRef,
        sheet_range: Option<&str>,
        header_row: Option<usize>,
    ) -> Result<SheetTable, GatewayError> {
        let fetched = self.get_values(spreadsheet, sheet_range, 0).await?;
        SheetTable::from_values(fetched.values, header_row)
            .map_err(|e| GatewayError::Shape(e.to_string()))
    }

    async fn batch_update(
        &self,
        spreadsheet: &DocumentRef,
        requests: Vec<Value>,
    ) -> Result<Value, GatewayError> {
        let id = spreadsheet.resolve()?;
        let token = self.auth.access_token().await?;

        let resp = self
            .client
            .post(format!("{}/{}:batchUpdate", self.base_url, id))
            .bearer_auth(&token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        resp.json().await.map_err(GatewayError::transport)
    }
}

fn values_len(append_body: &Value) -> u64 {
    append_body
        .pointer("/updates/updatedRows")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}
