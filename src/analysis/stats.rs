//! Medians and comparison figures for filtered report groups.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::{AnalysisError, ReceptionReportGroup};

/// Median of `values`, sorting them ascending in place first unless
/// `pre_sorted` is set.
///
/// A pre-sorted slice may be in either direction: the middle element(s)
/// are the same. Works for any numeric type that widens losslessly to
/// `f64` (`i8`, `i16`, `i32`, `u16`, `f32`, `f64`, ...).
pub fn median<T>(values: &mut [T], pre_sorted: bool) -> Result<f64, AnalysisError>
where
    T: Copy + PartialOrd + Into<f64>,
{
    if values.is_empty() {
        return Err(AnalysisError::EmptyMedianInput);
    }
    if !pre_sorted {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    }

    let n = values.len();
    if n % 2 == 0 {
        Ok((values[n / 2 - 1].into() + values[n / 2].into()) / 2.0)
    } else {
        Ok(values[n / 2].into())
    }
}

/// How the target fared within one receiver/time group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub rx_sign: String,
    pub time: Option<DateTime<Utc>>,
    pub target_distance_km: u16,
    /// 1-based rank by normalised SNR.
    pub target_rank: usize,
    pub report_count: usize,
    pub target_snr_norm_db: i8,
    /// Target normalised SNR minus the group median.
    pub target_vs_median_db: f64,
}

/// Per-group figures plus the aggregate over every group.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub groups: Vec<GroupSummary>,
    /// Normalised SNR of every non-target report relative to the target
    /// in the same group, across all groups.
    pub relative_snr_norms_db: Vec<i16>,
    /// Negated median of `relative_snr_norms_db`: positive means the target
    /// typically beat the other transmitters. `None` with fewer than two
    /// samples.
    pub offset_from_median_db: Option<f64>,
}

impl AnalysisSummary {
    pub fn sample_count(&self) -> usize {
        self.relative_snr_norms_db.len()
    }
}

/// Computes per-group and aggregate comparison figures.
///
/// Groups must come from `filter::filter_by_distance` (non-empty, sorted by
/// descending normalised SNR).
pub fn summarise(
    groups: &[ReceptionReportGroup],
    norm_tx_power_dbm: i8,
) -> Result<AnalysisSummary, AnalysisError> {
    let mut summaries = Vec::with_capacity(groups.len());
    let mut relative = Vec::new();

    for group in groups {
        let target = group.target();
        let target_norm = target.snr_norm_db(norm_tx_power_dbm);

        let mut norms: Vec<i8> = group
            .reports
            .iter()
            .map(|r| r.snr_norm_db(norm_tx_power_dbm))
            .collect();

        relative.extend(
            norms
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != group.target_index)
                // Inputs are already-wrapped i8 norms; i16 keeps the difference from wrapping twice.
                .map(|(_, &n)| i16::from(n) - i16::from(target_norm)),
        );

        let group_median = median(&mut norms, true)?;
        summaries.push(GroupSummary {
            rx_sign: group.rx_sign.clone(),
            time: group.time,
            target_distance_km: target.distance_km,
            target_rank: group.target_rank(),
            report_count: group.len(),
            target_snr_norm_db: target_norm,
            target_vs_median_db: f64::from(target_norm) - group_median,
        });
    }

    let offset_from_median_db = if relative.len() > 1 {
        let mut samples = relative.clone();
        Some(-median(&mut samples, false)?)
    } else {
        None
    };

    Ok(AnalysisSummary {
        groups: summaries,
        relative_snr_norms_db: relative,
        offset_from_median_db,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReceptionReport;

    // --- Median -------------------------------------------------------------

    #[test]
    fn test_median_odd_unsorted() {
        assert_eq!(median(&mut [3, 1, 4, 1, 5], false), Ok(3.0));
        assert_eq!(median(&mut [5, 2, 8, 1, 9], false), Ok(5.0));
    }

    #[test]
    fn test_median_even_presorted() {
        assert_eq!(median(&mut [1, 2, 3, 4], true), Ok(2.5));
        assert_eq!(median(&mut [10, 20], true), Ok(15.0));
    }

    #[test]
    fn test_median_single_element() {
        assert_eq!(median(&mut [42], true), Ok(42.0));
    }

    #[test]
    fn test_median_empty_fails() {
        let mut empty: [i32; 0] = [];
        assert_eq!(median(&mut empty, true), Err(AnalysisError::EmptyMedianInput));
        assert_eq!(median(&mut empty, false), Err(AnalysisError::EmptyMedianInput));
    }

    #[test]
    fn test_median_descending_presorted_matches_ascending() {
        assert_eq!(median(&mut [9i8, 7, 4, -2], true), Ok(5.5));
        assert_eq!(median(&mut [9i8, 7, 4, -2, -3], true), Ok(4.0));
    }

    #[test]
    fn test_median_float_and_small_int_types() {
        assert_eq!(median(&mut [1.5f64, 2.5, 3.5, 4.5], true), Ok(3.0));
        assert_eq!(median(&mut [-128i8, 127], true), Ok(-0.5));
        assert_eq!(median(&mut [300u16, 100, 200], false), Ok(200.0));
    }

    #[test]
    fn test_median_unsorted_sorts_in_place() {
        let mut values = [3, 1, 2];
        median(&mut values, false).unwrap();
        assert_eq!(values, [1, 2, 3]);
    }

    // --- Summaries ----------------------------------------------------------

    fn report(tx: &str, power_dbm: i8, snr_db: i8) -> ReceptionReport {
        ReceptionReport {
            time_str: "2024-12-14 15:30:00".to_string(),
            rx_sign: "K1RX".to_string(),
            tx_sign: tx.to_string(),
            power_dbm,
            snr_db,
            distance_km: 800,
            rx_azimuth: 270,
        }
    }

    /// Reports at the reference power, so normalised SNR equals raw SNR.
    fn group(snrs: &[(&str, i8)]) -> ReceptionReportGroup {
        let reports = snrs.iter().map(|(tx, snr)| report(tx, 43, *snr)).collect();
        ReceptionReportGroup::new(reports, "W5XYZ").unwrap()
    }

    #[test]
    fn test_summary_rank_and_median_odd_group() {
        let g = group(&[("A", -5), ("W5XYZ", -10), ("B", -20)]);
        let summary = summarise(&[g], 43).unwrap();
        let s = &summary.groups[0];
        assert_eq!(s.target_rank, 2);
        assert_eq!(s.report_count, 3);
        assert_eq!(s.target_snr_norm_db, -10);
        assert_eq!(s.target_vs_median_db, 0.0);
        assert_eq!(s.target_distance_km, 800);
        assert_eq!(summary.relative_snr_norms_db, vec![5, -10]);
    }

    #[test]
    fn test_summary_median_even_group() {
        let g = group(&[("W5XYZ", -4), ("A", -9), ("B", -12), ("C", -20)]);
        let summary = summarise(&[g], 43).unwrap();
        // Median of the middle pair (-9, -12) is -10.5.
        assert_eq!(summary.groups[0].target_vs_median_db, 6.5);
        assert_eq!(summary.groups[0].target_rank, 1);
    }

    #[test]
    fn test_aggregate_offset_is_negated_median_across_groups() {
        let g1 = group(&[("A", -5), ("W5XYZ", -10)]);
        let g2 = group(&[("W5XYZ", -8), ("B", -11), ("C", -14)]);
        let summary = summarise(&[g1, g2], 43).unwrap();
        // Relative samples: +5, -3, -6 -> median -3 -> offset +3.
        assert_eq!(summary.sample_count(), 3);
        assert_eq!(summary.offset_from_median_db, Some(3.0));
    }

    #[test]
    fn test_aggregate_needs_more_than_one_sample() {
        let g = group(&[("W5XYZ", -8), ("B", -11)]);
        let summary = summarise(&[g], 43).unwrap();
        assert_eq!(summary.sample_count(), 1);
        assert_eq!(summary.offset_from_median_db, None);
    }

    #[test]
    fn test_relative_snr_does_not_wrap() {
        let g = group(&[("A", 100), ("W5XYZ", -100)]);
        let summary = summarise(&[g], 43).unwrap();
        assert_eq!(summary.relative_snr_norms_db, vec![200]);
    }

    #[test]
    fn test_summarise_no_groups() {
        let summary = summarise(&[], 43).unwrap();
        assert!(summary.groups.is_empty());
        assert_eq!(summary.offset_from_median_db, None);
    }
}
