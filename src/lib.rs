//! WSPR reception comparison.
//!
//! Queries wspr.live for every report on a band where a receiver also heard
//! the target transmitter at the same time, normalises SNRs to a common
//! transmit power, and ranks the target against comparable transmitters
//! heard by the same receiver.
//!
//! Pipeline: `ingest::wspr_live` → `analysis::groupings` →
//! `analysis::filter` → `analysis::stats` → `report`.

pub mod analysis;
pub mod bands;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;

use crate::analysis::{filter, groupings, stats};
use crate::cli::AnalysisRequest;
use crate::config::Config;
use crate::logging::Source;
use crate::model::{AnalysisError, ReceptionReport};

/// Groups, filters and summarises already-fetched rows and renders the
/// report text.
///
/// `raw_reports` must be ordered by time then receiver callsign.
pub fn analyse_reports(
    raw_reports: &[ReceptionReport],
    target_callsign: &str,
    norm_tx_power_dbm: i8,
    verbose: bool,
) -> Result<String, AnalysisError> {
    let groups = groupings::group_by_receiver(raw_reports, target_callsign, norm_tx_power_dbm)?;
    let total_groups = groups.len();
    logging::debug(
        Source::Analysis,
        Some(target_callsign),
        &format!("{} reports in {} receiver/time groups", raw_reports.len(), total_groups),
    );

    let groups = filter::filter_by_distance(groups, target_callsign)?;
    logging::log_filter_summary(total_groups, groups.len());

    let summary = stats::summarise(&groups, norm_tx_power_dbm)?;
    Ok(report::render_report(&groups, &summary, norm_tx_power_dbm, verbose))
}

/// Runs the query described by `request` and returns the rendered report.
///
/// Fails with `NoReportsFound` when the query matches nothing.
pub fn run_analysis(
    client: &reqwest::blocking::Client,
    config: &Config,
    request: &AnalysisRequest,
) -> Result<String, AnalysisError> {
    let url = ingest::wspr_live::build_query_url(
        &config.base_url,
        &request.target_callsign,
        request.band,
        request.start,
        request.duration,
    )?;
    logging::debug(Source::WsprLive, Some(request.target_callsign.as_str()), &url);

    let raw_reports = ingest::wspr_live::fetch_reports(client, &url).inspect_err(|e| {
        logging::log_fetch_failure(&request.target_callsign, "wspr.live query", e)
    })?;

    analyse_fetched_reports(&raw_reports, request)
}

/// Analyses the rows returned for `request`.
///
/// An empty result is not analysed: it fails with `NoReportsFound`, which is
/// logged as an expected fetch outcome.
pub fn analyse_fetched_reports(
    raw_reports: &[ReceptionReport],
    request: &AnalysisRequest,
) -> Result<String, AnalysisError> {
    if raw_reports.is_empty() {
        let err = AnalysisError::NoReportsFound {
            target: request.target_callsign.clone(),
            band: request.band,
        };
        logging::log_fetch_failure(&request.target_callsign, "wspr.live query", &err);
        return Err(err);
    }
    logging::info(
        Source::WsprLive,
        Some(request.target_callsign.as_str()),
        &format!("Fetched {} reception reports", raw_reports.len()),
    );

    analyse_reports(
        raw_reports,
        &request.target_callsign,
        request.norm_tx_power_dbm,
        request.verbose,
    )
}
