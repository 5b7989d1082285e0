//! Organises flat query output into per-receiver/time report groups.

use std::cmp::Reverse;

use crate::model::{AnalysisError, ReceptionReport, ReceptionReportGroup};

/// Splits `raw_reports` into one group per (timestamp, receiver) run.
///
/// `raw_reports` must already be ordered by timestamp then receiver
/// callsign, as requested by `ingest::wspr_live::build_query_sql`; this
/// function only detects boundaries where either key changes. Within each
/// group reports are sorted by descending SNR normalised to
/// `norm_tx_power_dbm` (stable, so ties keep query order).
///
/// Fails with `TargetNotFound` as soon as any group lacks a report from
/// `target_callsign`.
pub fn group_by_receiver(
    raw_reports: &[ReceptionReport],
    target_callsign: &str,
    norm_tx_power_dbm: i8,
) -> Result<Vec<ReceptionReportGroup>, AnalysisError> {
    raw_reports
        .chunk_by(|a, b| a.time_str == b.time_str && a.rx_sign == b.rx_sign)
        .map(|run| {
            let mut reports = run.to_vec();
            reports.sort_by_key(|r| Reverse(r.snr_norm_db(norm_tx_power_dbm)));
            ReceptionReportGroup::new(reports, target_callsign)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
