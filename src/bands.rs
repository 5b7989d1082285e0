//! Band registry for wspr.live queries.
//!
//! Maps the short band names accepted on the command line to the integer
//! band codes used in the `band` column of `wspr.rx` (see the "Bands Table"
//! at https://wspr.live/). This is the single source of truth for band
//! codes; other modules should look bands up here rather than hardcoding
//! numbers.

use crate::model::AnalysisError;

/// A single amateur band as known to wspr.live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Lower-case band name, e.g. "20m".
    pub name: &'static str,
    /// wspr.live band code (roughly the frequency in MHz).
    pub code: i32,
}

/// All bands recognised by the tool, ordered by ascending frequency.
pub static BAND_REGISTRY: &[Band] = &[
    Band { name: "lf", code: -1 },
    Band { name: "mf", code: 0 },
    Band { name: "160m", code: 1 },
    Band { name: "80m", code: 3 },
    Band { name: "60m", code: 5 },
    Band { name: "40m", code: 7 },
    Band { name: "30m", code: 10 },
    Band { name: "20m", code: 14 },
    Band { name: "17m", code: 18 },
    Band { name: "15m", code: 21 },
    Band { name: "12m", code: 24 },
    Band { name: "10m", code: 28 },
    Band { name: "6m", code: 50 },
    Band { name: "4m", code: 70 },
    Band { name: "2m", code: 144 },
    Band { name: "70cm", code: 432 },
    Band { name: "23cm", code: 1296 },
];

/// Returns all band names in registry order (used for CLI help text).
pub fn band_names() -> Vec<&'static str> {
    BAND_REGISTRY.iter().map(|b| b.name).collect()
}

/// Converts a band name to its wspr.live code.
///
/// Matching is exact; the CLI lower-cases user input before calling this.
pub fn band_name_to_code(name: &str) -> Result<i32, AnalysisError> {
    BAND_REGISTRY
        .iter()
        .find(|b| b.name == name)
        .map(|b| b.code)
        .ok_or_else(|| AnalysisError::InvalidBandName(name.to_string()))
}

/// Looks up a band by code. Returns `None` if not found.
pub fn find_band_by_code(code: i32) -> Option<&'static Band> {
    BAND_REGISTRY.iter().find(|b| b.code == code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
