//! Blocking FRED observations client.

use crate::error::{DataError, Result};
use crate::series::{Observation, RawSeries};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// FRED observations endpoint
const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Hard timeout for the single request made per series
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<ObservationRecord>,
}

/// FRED reports both fields as strings; missing values use `"."`.
#[derive(Debug, Deserialize)]
struct ObservationRecord {
    date: String,
    value: String,
}

/// Client for the FRED `series/observations` endpoint.
///
/// One outbound call per [`FredClient::fetch_series`]; no caching and no retry.
pub struct FredClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for FredClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FredClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl FredClient {
    /// Create a client with the default 30 second timeout.
    ///
    /// A missing key is not an error here; it is reported when a series is
    /// actually fetched.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            api_key,
            base_url: FRED_BASE_URL.to_string(),
        })
    }

    /// Point the client at another endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch one series and return it cleaned (sorted, deduplicated, nulls
    /// dropped).
    ///
    /// # Errors
    /// - [`DataError::MissingApiKey`] when no credential is configured
    /// - [`DataError::Upstream`] on a non-success HTTP status
    /// - [`DataError::DataFormat`] when the body is not a FRED observations payload
    /// - [`DataError::Network`] on transport failures and timeouts
    pub fn fetch_series(&self, series_id: &str) -> Result<RawSeries> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(DataError::MissingApiKey)?;

        if series_id.trim().is_empty() {
            return Err(DataError::InvalidSeriesId(series_id.to_string()));
        }

        debug!(series_id, url = %self.base_url, "requesting FRED observations");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key),
                ("file_type", "json"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Upstream {
                series_id: series_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let series = parse_observations(series_id, &body)?;
        info!(series_id, rows = series.len(), "fetched series");
        Ok(series)
    }
}

/// Parse a FRED observations JSON body into a cleaned [`RawSeries`] named
/// after `series_id`.
///
/// Non-numeric values are treated as missing and dropped; an unparseable
/// date is a format error.
pub fn parse_observations(series_id: &str, body: &str) -> Result<RawSeries> {
    let response: ObservationsResponse =
        serde_json::from_str(body).map_err(|e| DataError::DataFormat {
            series_id: series_id.to_string(),
            reason: e.to_string(),
        })?;

    let mut observations = Vec::with_capacity(response.observations.len());
    for record in response.observations {
        let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d").map_err(|e| {
            DataError::DataFormat {
                series_id: series_id.to_string(),
                reason: format!("invalid date {:?}: {}", record.date, e),
            }
        })?;
        let value = record.value.trim().parse::<f64>().ok();
        observations.push(Observation::new(date, value));
    }

    Ok(RawSeries::cleaned(series_id, observations))
}
