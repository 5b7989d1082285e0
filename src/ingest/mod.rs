//! Clients for the external data sources the tool reads from.
//!
//! Submodules:
//! - `wspr_live` — query builder and HTTP client for the wspr.live ClickHouse database.

pub mod wspr_live;
