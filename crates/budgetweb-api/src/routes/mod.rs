//! Route handler modules
//!
//! - routes::selection: month/distance query parameter parsing
//! - routes::summary: monthly summary table, KPIs, charts
//! - routes::breakdown: top-tools breakdown
//! - routes::rows: tool detail listing
//! - routes::sheet: upload, reload, months, pipeline stats
//! - routes::export: CSV report downloads

pub mod breakdown;
pub mod export;
pub mod rows;
pub mod selection;
pub mod sheet;
pub mod summary;
