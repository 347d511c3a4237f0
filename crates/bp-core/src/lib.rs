//! `bp-core` — foundational types for the `rust_bp` behavior-module framework.
//!
//! This crate is a dependency of every other `bp-*` crate. It intentionally
//! has no `bp-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`handle`] | `ModuleHandle` — generation-tagged arena handle       |
//! | [`pose`]   | `Pose`, planar distance                               |
//! | [`time`]   | `Timestamp`, `ProcessingTimeRecord`, `TimeReporter`   |
//! | [`error`]  | `BpError`, `BpResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod handle;
pub mod pose;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BpError, BpResult};
pub use handle::ModuleHandle;
pub use pose::Pose;
pub use time::{ProcessingTimeRecord, TimeReporter, Timestamp};
