//! Fetcher for the AirNow "current observations by zip code" endpoint.
//!
//! One GET per invocation, no pagination and no retry. Any transport
//! failure, non-success status or undecodable body is returned to the
//! caller and ends the run.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;

use crate::{Config, RawObservation};

// ---

/// Build the query parameters AirNow expects, in its documented order.
pub fn query_params(cfg: &Config, date: NaiveDate) -> Vec<(&'static str, String)> {
    // ---
    vec![
        ("format", "application/json".to_string()),
        ("zipCode", cfg.zip_code.clone()),
        ("date", date.format("%Y-%m-%d").to_string()),
        ("distance", cfg.distance.to_string()),
        ("API_KEY", cfg.api_key.clone()),
    ]
}

/// Fetch the current observations for the configured zip code.
///
/// Records are returned in upstream order.
pub async fn fetch_observations(
    client: &Client,
    cfg: &Config,
    date: NaiveDate,
) -> Result<Vec<RawObservation>> {
    // ---
    tracing::debug!(
        "Fetching observations for zip {} on {} from {}",
        cfg.zip_code,
        date,
        cfg.api_url
    );

    let response = client
        .get(&cfg.api_url)
        .query(&query_params(cfg, date))
        .send()
        .await
        .with_context(|| format!("AirNow request to {} failed", cfg.api_url))?
        .error_for_status()
        .context("AirNow returned an error status")?;

    let body = response
        .text()
        .await
        .context("Failed to read AirNow response body")?;

    tracing::trace!("AirNow raw response: {}", body);

    let records: Vec<RawObservation> =
        serde_json::from_str(&body).context("Malformed AirNow response")?;

    tracing::info!("Fetched {} observation records", records.len());
    Ok(records)
}
