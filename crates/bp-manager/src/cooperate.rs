//! Cooperative-request protocol contract.
//!
//! Some maneuvers need external approval (an operator or supervision layer)
//! before they may proceed. The protocol implementation lives outside this
//! core; managers hold one interface object per sub-behavior and drive both
//! methods once per cycle from
//! [`publish_cooperate_status`][crate::ModuleManager::publish_cooperate_status].

use bp_core::Timestamp;

/// One cooperative-request surface (e.g. `"lane_change_left"`).
pub trait CooperateInterface {
    /// Drop recorded statuses older than the implementation's validity
    /// window. Called before every status publication.
    fn purge_expired(&mut self);

    /// Emit the current cooperate-status batch, stamped `now`.
    fn publish_status(&mut self, now: Timestamp);
}
