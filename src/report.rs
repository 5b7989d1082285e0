//! Console report formatting.
//!
//! Renders filtered groups and their `AnalysisSummary` as plain text. The
//! caller decides where the text goes.

use std::fmt::Write;

use crate::analysis::stats::AnalysisSummary;
use crate::model::{format_time, ReceptionReportGroup};

/// Renders the per-group comparison and the aggregate trailer.
///
/// `groups` and `summary.groups` must correspond one-to-one, as produced by
/// `analysis::stats::summarise`. With `verbose` set every report in each
/// group is listed, with the target marked `-->`.
pub fn render_report(
    groups: &[ReceptionReportGroup],
    summary: &AnalysisSummary,
    norm_tx_power_dbm: i8,
    verbose: bool,
) -> String {
    let mut out = String::new();

    for (group, stats) in groups.iter().zip(&summary.groups) {
        let _ = writeln!(
            out,
            "Received by {} (distance {}km) at {}:",
            stats.rx_sign,
            stats.target_distance_km,
            format_time(stats.time)
        );

        if verbose {
            for (i, report) in group.reports.iter().enumerate() {
                let marker = if i == group.target_index { "     -->" } else { "        " };
                let _ = writeln!(
                    out,
                    "{}{}: Transmitter: {}, Power: {}dBm, Distance: {}km, RX Azimuth: {}º, SNR: {:+}dB, Normalised SNR: {:+}dB",
                    marker,
                    i + 1,
                    report.tx_sign,
                    report.power_dbm,
                    report.distance_km,
                    report.rx_azimuth,
                    report.snr_db,
                    report.snr_norm_db(norm_tx_power_dbm)
                );
            }
        }

        let _ = writeln!(
            out,
            "    {} out of {} transmitters; Normalised SNR: {:+}dB, {:+.1}dBmedian",
            stats.target_rank, stats.report_count, stats.target_snr_norm_db, stats.target_vs_median_db
        );
    }

    out.push_str("\nOffset from median of relative normalised SNR of all other transmitters: ");
    match summary.offset_from_median_db {
        Some(offset) => {
            let _ = writeln!(out, "{:+.1}dBmedian ({} samples)", offset, summary.sample_count());
        }
        None => {
            let _ = writeln!(out, "insufficient samples ({})", summary.sample_count());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::summarise;
    use crate::model::ReceptionReport;

    fn report(tx: &str, power_dbm: i8, snr_db: i8) -> ReceptionReport {
        ReceptionReport {
            time_str: "2024-12-14 15:30:00".to_string(),
            rx_sign: "K1RX".to_string(),
            tx_sign: tx.to_string(),
            power_dbm,
            snr_db,
            distance_km: 1200,
            rx_azimuth: 45,
        }
    }

    fn sample_group() -> ReceptionReportGroup {
        ReceptionReportGroup::new(
            vec![report("N0OTH", 43, -5), report("W5XYZ", 23, -30), report("G3ABC", 37, -20)],
            "W5XYZ",
        )
        .unwrap()
    }

    #[test]
    fn test_render_group_header_and_rank() {
        let groups = vec![sample_group()];
        let summary = summarise(&groups, 43).unwrap();
        let text = render_report(&groups, &summary, 43, false);

        assert!(text.contains("Received by K1RX (distance 1200km) at 2024-12-14T15:30:00Z:"), "{}", text);
        // Normalised: N0OTH -5, W5XYZ -10, G3ABC -14; median -10.
        assert!(text.contains("    2 out of 3 transmitters; Normalised SNR: -10dB, +0.0dBmedian"), "{}", text);
        assert!(!text.contains("Transmitter:"), "entries are only listed when verbose");
    }

    #[test]
    fn test_render_verbose_marks_target() {
        let groups = vec![sample_group()];
        let summary = summarise(&groups, 43).unwrap();
        let text = render_report(&groups, &summary, 43, true);

        assert!(text.contains(
            "     -->2: Transmitter: W5XYZ, Power: 23dBm, Distance: 1200km, RX Azimuth: 45º, SNR: -30dB, Normalised SNR: -10dB"
        ), "{}", text);
        assert!(text.contains("        1: Transmitter: N0OTH"), "{}", text);
    }

    #[test]
    fn test_render_aggregate_trailer() {
        let groups = vec![sample_group()];
        let summary = summarise(&groups, 43).unwrap();
        let text = render_report(&groups, &summary, 43, false);
        // Relative: +5 and -4 -> median +0.5 -> offset -0.5.
        assert!(text.ends_with(
            "Offset from median of relative normalised SNR of all other transmitters: -0.5dBmedian (2 samples)\n"
        ), "{}", text);
    }

    #[test]
    fn test_render_without_enough_samples() {
        let summary = summarise(&[], 43).unwrap();
        let text = render_report(&[], &summary, 43, false);
        assert!(text.ends_with("insufficient samples (0)\n"), "{}", text);
        assert!(!text.contains("dBmedian"));
    }
}
