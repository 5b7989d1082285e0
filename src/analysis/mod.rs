//! Report grouping, filtering and statistics for the WSPR comparison tool.
//!
//! The passes run in the order listed over the rows returned by the query.
//!
//! Submodules:
//! - `groupings` — splits the flat query output into per-receiver/time groups.
//! - `filter` — drops transmitters whose distance is not comparable to the target's.
//! - `stats` — medians and the per-group / aggregate comparison figures.

pub mod filter;
pub mod groupings;
pub mod stats;
