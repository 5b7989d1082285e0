//! Distance-based comparability filter.
//!
//! Transmitters much closer to or further from the receiver than the target
//! see a different propagation path, so their SNR says little about the
//! target's station. Each group is cut down to reports within a window
//! around the target's distance; groups left with nothing to compare
//! against are dropped.

use crate::logging::{self, Source};
use crate::model::{format_time, AnalysisError, ReceptionReportGroup};

/// Lower bound of the window as a fraction of the target distance.
pub const DISTANCE_MIN_FACTOR: f64 = 0.75;

/// Upper bound of the window as a fraction of the target distance.
pub const DISTANCE_MAX_FACTOR: f64 = 1.25;

/// The upper bound never drops below this, so very close targets still
/// have a usable window.
pub const DISTANCE_MAX_FLOOR_KM: u16 = 50;

/// A group needs at least this many reports to say anything about the target.
pub const MIN_GROUP_SIZE: usize = 2;

/// Inclusive `(min, max)` distance window around `target_distance_km`.
///
/// Bounds are truncated to whole kilometres. The float-to-int cast
/// saturates, so the upper bound tops out at `u16::MAX` for very long paths.
pub fn distance_window(target_distance_km: u16) -> (u16, u16) {
    let d = f64::from(target_distance_km);
    let min_km = (d * DISTANCE_MIN_FACTOR) as u16;
    let max_km = ((d * DISTANCE_MAX_FACTOR) as u16).max(DISTANCE_MAX_FLOOR_KM);
    (min_km, max_km)
}

/// Removes reports whose distance falls outside each group's window and
/// drops groups left with fewer than `MIN_GROUP_SIZE` reports.
///
/// Group order is preserved. Dropped groups are logged, not reported as
/// errors. Rebuilding a group re-resolves the target index; failure there
/// means the target fell outside its own window, which cannot happen for
/// well-formed input.
pub fn filter_by_distance(
    groups: Vec<ReceptionReportGroup>,
    target_callsign: &str,
) -> Result<Vec<ReceptionReportGroup>, AnalysisError> {
    let mut filtered = Vec::with_capacity(groups.len());

    for group in groups {
        let (min_km, max_km) = distance_window(group.target().distance_km);
        let rx_sign = group.rx_sign;
        let time = group.time;

        let kept: Vec<_> = group
            .reports
            .into_iter()
            .filter(|r| r.distance_km >= min_km && r.distance_km <= max_km)
            .collect();

        let rebuilt = ReceptionReportGroup::new(kept, target_callsign)?;
        if rebuilt.len() < MIN_GROUP_SIZE {
            logging::info(
                Source::Analysis,
                Some(rx_sign.as_str()),
                &format!(
                    "Reports from {} at {} filtered out due to insufficient comparable transmitters",
                    rx_sign,
                    format_time(time)
                ),
            );
            continue;
        }
        filtered.push(rebuilt);
    }

    Ok(filtered)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
