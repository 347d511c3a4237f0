//! `bp-module` — the scene-module contract and the instance registry.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`module`]   | `SceneModule` trait — the per-instance collaborator contract     |
//! | [`context`]  | `PlannerContext` snapshot and `StageOutput`                      |
//! | [`factor`]   | `ManeuverKind`, steering/velocity factors and stamped batches    |
//! | [`marker`]   | `Marker`/`MarkerBatch`, virtual-wall synthesis                   |
//! | [`registry`] | `ModuleRegistry` — generation-tagged arena owning the instances  |
//! | [`noop`]     | `NoopModule` — placeholder instance that never requests to run   |
//! | [`error`]    | `ModuleError`, `ModuleResult<T>`                                 |
//!
//! # Design notes
//!
//! Instance *ownership* and instance *tracking* are deliberately split. The
//! [`ModuleRegistry`] is the single owner of every `Box<dyn SceneModule>`;
//! managers track instances only through [`ModuleHandle`]s
//! ([`bp_core::ModuleHandle`]) and must re-validate liveness on every access.
//! Removing an instance from the registry bumps the slot generation, so
//! every outstanding handle goes stale at once and a later lookup simply
//! returns `None` — the expired-weak-reference race is an ordinary `Option`.

pub mod context;
pub mod error;
pub mod factor;
pub mod marker;
pub mod module;
pub mod noop;
pub mod registry;


pub use context::{PlannerContext, StageOutput};
pub use error::{ModuleError, ModuleResult};
pub use factor::{
    ManeuverKind, SteerDirection, SteeringFactor, SteeringFactorBatch, VelocityFactor,
    VelocityFactorBatch, VelocityStatus,
};
pub use marker::{Marker, MarkerBatch, MarkerShape, WallKind};
pub use module::SceneModule;
pub use noop::NoopModule;
pub use registry::ModuleRegistry;
