use event_layout::RawEvent;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to upstream failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream answered with status {0}")]
    Status(StatusCode),

    #[error("Upstream payload is not a JSON array: {0}")]
    Payload(#[from] serde_json::Error),
}

pub async fn fetch_rows(client: &Client, url: &Url) -> Result<Vec<RawEvent>, FetchError> {
    debug!("Fetching approved events from {url}");
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    decode_rows(&response.text().await?)
}

/// Decodes a JSON array of rows. Rows that do not have the expected shape
/// are logged and left out.
pub fn decode_rows(body: &str) -> Result<Vec<RawEvent>, FetchError> {
    let values = serde_json::from_str::<Vec<Value>>(body)?;
    let total = values.len();

    let rows = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!("Skipping upstream row {index}: {err}");
                None
            }
        })
        .collect::<Vec<RawEvent>>();

    debug!("Decoded {} of {total} upstream rows", rows.len());
    Ok(rows)
}
