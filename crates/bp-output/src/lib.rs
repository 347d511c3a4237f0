//! `bp-output` — where status batches leave the manager.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`channels`] | `ReportChannels` / `ReportReceivers` — per-batch-kind pipes  |
//! | [`writer`]   | `ReportWriter` trait implemented by persisted backends       |
//! | [`csv`]      | `CsvReportWriter` — factor and wall logs as CSV files        |
//! | [`error`]    | `OutputError`, `OutputResult<T>`                             |
//!
//! Each publication target is an independent channel; a dropped or slow
//! consumer on one channel never affects delivery on the others, and batches
//! are transient per-cycle snapshots — nothing here is replayed.

pub mod channels;
pub mod csv;
pub mod error;
pub mod writer;


pub use channels::{ReportChannels, ReportReceivers};
pub use error::{OutputError, OutputResult};
pub use writer::ReportWriter;

pub use crate::csv::CsvReportWriter;
