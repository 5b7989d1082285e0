//! Core data types for the WSPR comparison tool.
//!
//! This module defines the shared domain model imported by all other modules:
//! the reception report as returned by wspr.live, the per-receiver report
//! group built by `analysis::groupings`, and the crate-wide error type.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;

/// Timestamp layout used by the `time` column of `wspr.rx`.
pub const WSPR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A single WSPR reception report.
///
/// Corresponds to one entry in the `data[]` array of a wspr.live JSON
/// response. Field widths follow the ClickHouse column types (`Int8` for
/// power and SNR, `UInt16` for distance and azimuth).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReceptionReport {
    #[serde(rename = "time")]
    pub time_str: String, // "2024-12-14 15:30:45", UTC
    pub rx_sign: String,
    pub tx_sign: String,
    #[serde(rename = "power")]
    pub power_dbm: i8,
    #[serde(rename = "snr")]
    pub snr_db: i8,
    #[serde(rename = "distance")]
    pub distance_km: u16,
    pub rx_azimuth: u16, // degrees
}

impl ReceptionReport {
    /// Parses `time_str` as a UTC timestamp.
    ///
    /// Returns `None` rather than an error when the string is not in
    /// `WSPR_TIME_FORMAT`; callers carry the invalid marker through to the
    /// output instead of aborting the run.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.time_str, WSPR_TIME_FORMAT)
            .ok()
            .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }

    /// SNR this transmission would have had at `ref_power_dbm`.
    ///
    /// Arithmetic is 8-bit two's complement and wraps on overflow, matching
    /// the width of the source columns.
    pub fn snr_norm_db(&self, ref_power_dbm: i8) -> i8 {
        self.snr_db
            .wrapping_add(ref_power_dbm)
            .wrapping_sub(self.power_dbm)
    }
}

/// All reports heard by one receiver at one instant.
///
/// Produced by `analysis::groupings::group_by_receiver` from the flat,
/// time-then-receiver ordered list returned by the query. `reports` is
/// ordered by descending normalised SNR and `target_index` always points at
/// the target transmitter's report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceptionReportGroup {
    pub rx_sign: String,
    pub time: Option<DateTime<Utc>>,
    pub reports: Vec<ReceptionReport>,
    pub target_index: usize,
}

impl ReceptionReportGroup {
    /// Builds a group from reports that share a receiver and timestamp,
    /// locating the first report sent by `target_callsign`.
    ///
    /// Order of `reports` is preserved; sorting is the caller's job.
    pub fn new(
        reports: Vec<ReceptionReport>,
        target_callsign: &str,
    ) -> Result<Self, AnalysisError> {
        let first = reports.first().ok_or(AnalysisError::EmptyGroup)?;
        let rx_sign = first.rx_sign.clone();
        let time = first.time();

        let target_index = reports
            .iter()
            .position(|r| r.tx_sign == target_callsign)
            .ok_or_else(|| AnalysisError::TargetNotFound {
                target: target_callsign.to_string(),
                rx_sign: rx_sign.clone(),
                time: format_time(time),
            })?;

        Ok(ReceptionReportGroup {
            rx_sign,
            time,
            reports,
            target_index,
        })
    }

    /// The target transmitter's report.
    pub fn target(&self) -> &ReceptionReport {
        &self.reports[self.target_index]
    }

    /// 1-based position of the target within the SNR ranking.
    pub fn target_rank(&self) -> usize {
        self.target_index + 1
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Formats a group timestamp as RFC 3339 with a `Z` suffix, or a fixed
/// marker when the source timestamp could not be parsed.
pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => "<invalid time>".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when validating input, fetching from wspr.live or
/// analysing the returned reports.
#[derive(Debug, PartialEq)]
pub enum AnalysisError {
    /// The target transmitter was missing from a receiver/time group.
    TargetNotFound {
        target: String,
        rx_sign: String,
        time: String,
    },
    /// A report group was built from zero reports.
    EmptyGroup,
    /// A median was requested over zero samples.
    EmptyMedianInput,
    /// The band name is not in `bands::BAND_REGISTRY`.
    InvalidBandName(String),
    /// The start time is not valid RFC 3339.
    InvalidTimeFormat(String),
    /// The duration string could not be parsed or is not positive.
    InvalidDuration(String),
    /// The reference power is outside the signed 8-bit range.
    InvalidPowerRange(i64),
    /// The query matched no rows.
    NoReportsFound { target: String, band: i32 },
    /// Non-2xx HTTP response from wspr.live.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    RequestError(String),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The configuration file could not be read or parsed.
    ConfigError(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::TargetNotFound {
                target,
                rx_sign,
                time,
            } => write!(
                f,
                "target transmitter {} not found in report group for receiver {} at time {}",
                target, rx_sign, time
            ),
            AnalysisError::EmptyGroup => write!(f, "cannot build a report group from no reports"),
            AnalysisError::EmptyMedianInput => write!(f, "cannot calculate median of empty slice"),
            AnalysisError::InvalidBandName(name) => write!(f, "unrecognised band name: {}", name),
            AnalysisError::InvalidTimeFormat(msg) => write!(f, "invalid start time: {}", msg),
            AnalysisError::InvalidDuration(msg) => write!(f, "invalid duration: {}", msg),
            AnalysisError::InvalidPowerRange(power) => write!(
                f,
                "normalised transmit power must be between -128 and 127 dBm, got {}",
                power
            ),
            AnalysisError::NoReportsFound { target, band } => write!(
                f,
                "no reception reports found for {} on band {} in the specified time range",
                target, band
            ),
            AnalysisError::HttpError(code) => write!(f, "HTTP error: {}", code),
            AnalysisError::RequestError(msg) => write!(f, "Request error: {}", msg),
            AnalysisError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AnalysisError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(tx_sign: &str, power_dbm: i8, snr_db: i8) -> ReceptionReport {
        ReceptionReport {
            time_str: "2024-12-14 15:30:45".to_string(),
            rx_sign: "W5ABC".to_string(),
            tx_sign: tx_sign.to_string(),
            power_dbm,
            snr_db,
            distance_km: 250,
            rx_azimuth: 45,
        }
    }

    // --- Timestamp parsing --------------------------------------------------

    #[test]
    fn test_time_parses_wspr_format() {
        let r = report("W5XYZ", 10, -15);
        let expected = Utc.with_ymd_and_hms(2024, 12, 14, 15, 30, 45).unwrap();
        assert_eq!(r.time(), Some(expected));
    }

    #[test]
    fn test_unparseable_time_yields_none_not_error() {
        let mut r = report("W5XYZ", 10, -15);
        r.time_str = "2024-12-14T15:30:45Z".to_string();
        assert_eq!(r.time(), None, "RFC 3339 is not the wspr.live column format");
        r.time_str = String::new();
        assert_eq!(r.time(), None);
    }

    // --- Normalised SNR -----------------------------------------------------

    #[test]
    fn test_snr_norm_examples() {
        assert_eq!(report("A", 10, -10).snr_norm_db(43), 23);
        assert_eq!(report("A", -5, -20).snr_norm_db(20), 5);
    }

    #[test]
    fn test_snr_norm_at_reference_power_is_unchanged() {
        assert_eq!(report("A", 37, -12).snr_norm_db(37), -12);
    }

    #[test]
    fn test_snr_norm_wraps_like_eight_bit_arithmetic() {
        // 20 + 127 - (-30) = 177, which wraps to 177 - 256 = -79.
        assert_eq!(report("A", -30, 20).snr_norm_db(127), -79);
    }

    // --- Group construction -------------------------------------------------

    #[test]
    fn test_new_group_locates_target() {
        let reports = vec![report("N0OTH", 20, -10), report("W5XYZ", 10, -15), report("G3ABC", 30, -5)];
        let group = ReceptionReportGroup::new(reports, "W5XYZ").expect("target is present");
        assert_eq!(group.target_index, 1);
        assert_eq!(group.target_rank(), 2);
        assert_eq!(group.rx_sign, "W5ABC");
        assert_eq!(group.len(), 3);
        assert_eq!(group.target().tx_sign, "W5XYZ");
    }

    #[test]
    fn test_new_group_singleton_target() {
        let group = ReceptionReportGroup::new(vec![report("W5XYZ", 10, -15)], "W5XYZ")
            .expect("singleton target group is valid");
        assert_eq!(group.target_index, 0);
    }

    #[test]
    fn test_new_group_without_target_fails() {
        let err = ReceptionReportGroup::new(vec![report("N0OTH", 20, -10)], "W5XYZ").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::TargetNotFound {
                target: "W5XYZ".to_string(),
                rx_sign: "W5ABC".to_string(),
                time: "2024-12-14T15:30:45Z".to_string(),
            }
        );
    }

    #[test]
    fn test_new_group_from_empty_reports_fails() {
        assert_eq!(
            ReceptionReportGroup::new(Vec::new(), "W5XYZ"),
            Err(AnalysisError::EmptyGroup)
        );
    }

    #[test]
    fn test_report_deserializes_from_wspr_live_row() {
        let row = r#"{"time":"2024-12-14 15:30:45","rx_sign":"W5ABC","tx_sign":"W5XYZ",
                      "power":10,"snr":-15,"distance":250,"rx_azimuth":45}"#;
        let r: ReceptionReport = serde_json::from_str(row).expect("row should decode");
        assert_eq!(r, report("W5XYZ", 10, -15));
    }

    #[test]
    fn test_error_display_includes_context() {
        let err = AnalysisError::NoReportsFound { target: "W5XYZ".to_string(), band: 14 };
        let msg = err.to_string();
        assert!(msg.contains("W5XYZ") && msg.contains("14"), "got: {}", msg);
        assert_eq!(AnalysisError::HttpError(503).to_string(), "HTTP error: 503");
    }
}
