//! Command line input validation.
//!
//! Everything here runs before the query is sent, so a typo costs nothing
//! but an error message.

use chrono::{DateTime, Duration, Utc};

use crate::bands::band_name_to_code;
use crate::model::AnalysisError;

/// Longest accepted query window, matching the range of a signed 64-bit
/// nanosecond count (about 2562047 hours).
pub const MAX_DURATION_SECS: f64 = 9_223_372_036.0;

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Upper-cased target callsign.
    pub target_callsign: String,
    /// wspr.live band code.
    pub band: i32,
    pub start: DateTime<Utc>,
    pub duration: Duration,
    pub norm_tx_power_dbm: i8,
    pub verbose: bool,
}

impl AnalysisRequest {
    /// Validates raw command line values.
    ///
    /// The callsign is upper-cased and the band name lower-cased before
    /// lookup, so "w5xyz 20M" is accepted.
    pub fn from_args(
        target: &str,
        band_name: &str,
        start: &str,
        duration: &str,
        norm_tx_power_dbm: i64,
        verbose: bool,
    ) -> Result<Self, AnalysisError> {
        Ok(AnalysisRequest {
            target_callsign: target.trim().to_uppercase(),
            band: band_name_to_code(&band_name.trim().to_lowercase())?,
            start: parse_start_time(start)?,
            duration: parse_duration(duration)?,
            norm_tx_power_dbm: validate_norm_power(norm_tx_power_dbm)?,
            verbose,
        })
    }
}

/// Parses an RFC 3339 start time, e.g. "2024-12-14T00:00:00Z".
pub fn parse_start_time(s: &str) -> Result<DateTime<Utc>, AnalysisError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AnalysisError::InvalidTimeFormat(format!("'{}': {}", s, e)))
}

/// Parses a duration such as "24h", "30m", "1h30m" or "1.5h".
///
/// Units are `h`, `m` and `s`; every number needs a unit. The result must
/// be positive and no longer than `MAX_DURATION_SECS`.
pub fn parse_duration(s: &str) -> Result<Duration, AnalysisError> {
    let invalid = || AnalysisError::InvalidDuration(s.to_string());
    let is_number_char = |c: char| c.is_ascii_digit() || c == '.';

    let mut rest = s.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_secs = 0.0;
    while !rest.is_empty() {
        let number_len = rest.find(|c: char| !is_number_char(c)).ok_or_else(invalid)?;
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest.find(is_number_char).unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            _ => return Err(invalid()),
        };
        total_secs += value * scale;
        rest = &rest[unit_len..];
    }

    if !total_secs.is_finite() || total_secs > MAX_DURATION_SECS {
        return Err(invalid());
    }
    let millis = (total_secs * 1000.0).round() as i64;
    if millis <= 0 {
        return Err(invalid());
    }
    Duration::try_milliseconds(millis).ok_or_else(invalid)
}

/// Checks the reference power fits the signed 8-bit dBm range.
pub fn validate_norm_power(power_dbm: i64) -> Result<i8, AnalysisError> {
    i8::try_from(power_dbm).map_err(|_| AnalysisError::InvalidPowerRange(power_dbm))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
