//! wspr.live Data API Client
//!
//! Retrieves WSPR reception reports from the public wspr.live ClickHouse
//! database, which accepts SQL in the `query` URL parameter and returns
//! rows wrapped in a JSON envelope.
//!
//! API Documentation: https://wspr.live/

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::model::{AnalysisError, ReceptionReport, WSPR_TIME_FORMAT};

/// Default endpoint for the wspr.live database.
pub const WSPR_LIVE_BASE_URL: &str = "https://db1.wspr.live/";

// ============================================================================
// Response Structures
// ============================================================================

/// Response body for `FORMAT JSON` queries.
///
/// ClickHouse also sends `meta`, `rows` and `statistics`; only the rows are
/// used.
#[derive(Debug, Deserialize)]
pub struct WsprLiveResponse {
    pub data: Vec<ReceptionReport>,
}

// ============================================================================
// Query Construction
// ============================================================================

/// Quotes a value for use inside a single-quoted ClickHouse string literal.
fn escape_sql_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Builds the SQL selecting every report on `band` in
/// `[start, start + duration)` whose receiver also heard `target_callsign`
/// at the same time on the same band.
///
/// Rows are ordered by time then receiver callsign, which is the ordering
/// `analysis::groupings::group_by_receiver` relies on. Fails with
/// `InvalidDuration` when the window end is past the representable range.
pub fn build_query_sql(
    target_callsign: &str,
    band: i32,
    start: DateTime<Utc>,
    duration: Duration,
) -> Result<String, AnalysisError> {
    let end = start.checked_add_signed(duration).ok_or_else(|| {
        AnalysisError::InvalidDuration(format!(
            "{}s from {} overflows the time range",
            duration.num_seconds(),
            start.format(WSPR_TIME_FORMAT)
        ))
    })?;
    let target = escape_sql_string(target_callsign);

    Ok(format!(
        "SELECT tx_sign, rx_sign, time, power, distance, rx_azimuth, snr FROM wspr.rx AS R WHERE \
         band = {band} AND \
         time >= '{start}' AND \
         time < '{end}' AND \
         EXISTS (SELECT 1 FROM wspr.rx AS S WHERE S.tx_sign = '{target}' AND S.band = {band} \
         AND S.rx_sign = R.rx_sign AND S.time = R.time) \
         ORDER BY time ASC, rx_sign ASC FORMAT JSON",
        band = band,
        start = start.format(WSPR_TIME_FORMAT),
        end = end.format(WSPR_TIME_FORMAT),
        target = target,
    ))
}

/// Builds the full request URL, with the SQL from `build_query_sql`
/// percent-encoded into the `query` parameter of `base_url`.
pub fn build_query_url(
    base_url: &str,
    target_callsign: &str,
    band: i32,
    start: DateTime<Utc>,
    duration: Duration,
) -> Result<String, AnalysisError> {
    let sql = build_query_sql(target_callsign, band, start, duration)?;
    reqwest::Url::parse_with_params(base_url, &[("query", sql.as_str())])
        .map(|url| url.to_string())
        .map_err(|e| AnalysisError::ConfigError(format!("invalid base URL '{}': {}", base_url, e)))
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Build a blocking HTTP client with the given request timeout.
pub fn build_client(timeout: std::time::Duration) -> Result<reqwest::blocking::Client, AnalysisError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AnalysisError::RequestError(e.to_string()))
}

/// Decode a wspr.live JSON response body into reception reports.
pub fn parse_query_response(body: &str) -> Result<Vec<ReceptionReport>, AnalysisError> {
    let response: WsprLiveResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::ParseError(e.to_string()))?;
    Ok(response.data)
}

/// Run a query URL against wspr.live and decode the returned rows.
///
/// # Parameters
/// - `client`: HTTP client
/// - `url`: output of `build_query_url`
///
/// # Returns
/// Rows in the order the query requested; empty if nothing matched.
pub fn fetch_reports(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<Vec<ReceptionReport>, AnalysisError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| AnalysisError::RequestError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AnalysisError::HttpError(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| AnalysisError::RequestError(format!("failed to read response body: {}", e)))?;

    parse_query_response(&body)
}

// ============================================================================
// Tests
// ============================================================================
