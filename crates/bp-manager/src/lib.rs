//! `bp-manager` — the per-behavior-type module lifecycle manager.
//!
//! One [`ModuleManager`] exists per behavior category (lane change, pull
//! over, avoidance, …). It decides *whether* an instance of its behavior
//! should run, tracks active instances without owning them, and aggregates
//! their status into the shared reporting surfaces once per planning cycle.
//! It never computes a trajectory itself.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`manager`]   | `ModuleManager` — admission, lifecycle, aggregation           |
//! | [`observer`]  | `ObserverSet` — ordered, non-owning handle tracking           |
//! | [`idle`]      | `IdleSlot` — the disposable activation-probe instance         |
//! | [`plugin`]    | `ModulePlugin` trait + `AdmissionConfig`                      |
//! | [`params`]    | `ParamPatch` / `ParamValue` runtime parameter updates         |
//! | [`cooperate`] | `CooperateInterface` — external-approval protocol contract    |
//! | [`error`]     | `ManagerError`, `ManagerResult<T>`                            |
//!
//! # Per-cycle sequencing contract
//!
//! The orchestrator drives each manager synchronously, once per planning
//! tick, in this order:
//!
//! 1. `set_context` + admission / idle probe (`is_execution_requested`)
//! 2. optional `register_new_module`
//! 3. `update_observer` (prune stale handles)
//! 4. the `publish_*` aggregation calls
//!
//! Violating the order risks aggregating over a half-pruned set. Nothing in
//! this crate blocks or suspends; `reset` is the sole forced-teardown path.

pub mod cooperate;
pub mod error;
pub mod idle;
pub mod manager;
pub mod observer;
pub mod params;
pub mod plugin;

#[cfg(test)]
mod tests;

pub use cooperate::CooperateInterface;
pub use error::{ManagerError, ManagerResult};
pub use idle::IdleSlot;
pub use manager::ModuleManager;
pub use observer::ObserverSet;
pub use params::{ParamPatch, ParamValue};
pub use plugin::{AdmissionConfig, ModulePlugin};
