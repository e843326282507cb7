//! Report module - terminal tables, charts, and the run summary

pub mod charts;
pub mod summary;
pub mod tables;

pub use charts::*;
pub use summary::RunSummary;
pub use tables::*;
