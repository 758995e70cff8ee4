// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached capability values and change detection.

use crate::status::{StatusSnapshot, VehiclePresence};

/// A single change to a cached capability value.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// The door-closed state changed.
    DoorClosed(bool),
    /// The distance reading changed.
    Distance(f64),
    /// The vehicle presence changed.
    Vehicle(VehiclePresence),
    /// The signal strength changed.
    Rssi(i64),
}

/// Last-known capability values for the device.
///
/// All fields are optional because values are unknown until the first poll
/// succeeds. Writes are suppressed when the incoming value equals the cached
/// one, so a change report always means an actual transition.
///
/// # Examples
///
/// ```
/// use opengarage_lib::state::{DeviceState, StateChange};
///
/// let mut state = DeviceState::new();
/// assert!(state.apply(&StateChange::DoorClosed(true)));
/// assert!(!state.apply(&StateChange::DoorClosed(true)));
/// assert_eq!(state.door_closed(), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    door_closed: Option<bool>,
    distance: Option<f64>,
    vehicle: Option<VehiclePresence>,
    rssi: Option<i64>,
}

impl DeviceState {
    /// Creates a new empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the door is closed, if known.
    #[must_use]
    pub fn door_closed(&self) -> Option<bool> {
        self.door_closed
    }

    /// Returns the distance reading in centimeters, if known.
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// Returns the vehicle presence, if known.
    #[must_use]
    pub fn vehicle(&self) -> Option<VehiclePresence> {
        self.vehicle
    }

    /// Returns the signal strength in dBm, if known.
    #[must_use]
    pub fn rssi(&self) -> Option<i64> {
        self.rssi
    }

    /// Applies a change and returns whether the cached value was modified.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::DoorClosed(closed) => {
                if self.door_closed == Some(*closed) {
                    false
                } else {
                    self.door_closed = Some(*closed);
                    true
                }
            }
            StateChange::Distance(dist) => {
                if self.distance == Some(*dist) {
                    false
                } else {
                    self.distance = Some(*dist);
                    true
                }
            }
            StateChange::Vehicle(presence) => {
                if self.vehicle == Some(*presence) {
                    false
                } else {
                    self.vehicle = Some(*presence);
                    true
                }
            }
            StateChange::Rssi(rssi) => {
                if self.rssi == Some(*rssi) {
                    false
                } else {
                    self.rssi = Some(*rssi);
                    true
                }
            }
        }
    }

    /// Compares a snapshot against the cache and returns only the fields
    /// that actually differ.
    ///
    /// An unchanged snapshot produces an empty list.
    #[must_use]
    pub fn diff_snapshot(&self, snapshot: &StatusSnapshot) -> Vec<StateChange> {
        let mut changes = Vec::new();

        let closed = snapshot.door_state().is_closed();
        if self.door_closed != Some(closed) {
            changes.push(StateChange::DoorClosed(closed));
        }

        if self.distance != Some(snapshot.dist) {
            changes.push(StateChange::Distance(snapshot.dist));
        }

        let presence = snapshot.vehicle_presence();
        if self.vehicle != Some(presence) {
            changes.push(StateChange::Vehicle(presence));
        }

        if self.rssi != Some(snapshot.rssi) {
            changes.push(StateChange::Rssi(snapshot.rssi));
        }

        changes
    }

    /// Clears all cached values, resetting to unknown.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(door: u8, dist: f64, vehicle: u8, rssi: i64) -> StatusSnapshot {
        StatusSnapshot {
            door,
            dist,
            vehicle,
            rssi,
        }
    }

    #[test]
    fn new_state_is_unknown() {
        let state = DeviceState::new();
        assert!(state.door_closed().is_none());
        assert!(state.distance().is_none());
        assert!(state.vehicle().is_none());
        assert!(state.rssi().is_none());
    }

    #[test]
    fn apply_reports_change() {
        let mut state = DeviceState::new();

        assert!(state.apply(&StateChange::Distance(50.0)));
        assert!(!state.apply(&StateChange::Distance(50.0)));
        assert!(state.apply(&StateChange::Distance(51.0)));
        assert_eq!(state.distance(), Some(51.0));
    }

    #[test]
    fn first_snapshot_changes_everything() {
        let state = DeviceState::new();
        let changes = state.diff_snapshot(&snapshot(0, 50.0, 0, -60));
        assert_eq!(changes.len(), 4);
    }

    #[test]
    fn unchanged_snapshot_produces_no_changes() {
        let mut state = DeviceState::new();
        let snap = snapshot(0, 50.0, 0, -60);
        for change in state.diff_snapshot(&snap) {
            state.apply(&change);
        }

        assert!(state.diff_snapshot(&snap).is_empty());
    }

    #[test]
    fn door_transition_is_the_only_change() {
        let mut state = DeviceState::new();
        for change in state.diff_snapshot(&snapshot(0, 50.0, 0, -60)) {
            state.apply(&change);
        }

        let changes = state.diff_snapshot(&snapshot(1, 50.0, 0, -60));
        assert_eq!(changes, vec![StateChange::DoorClosed(false)]);
    }

    #[test]
    fn vehicle_transition_detected() {
        let mut state = DeviceState::new();
        for change in state.diff_snapshot(&snapshot(0, 50.0, 0, -60)) {
            state.apply(&change);
        }

        let changes = state.diff_snapshot(&snapshot(0, 50.0, 1, -60));
        assert_eq!(changes, vec![StateChange::Vehicle(VehiclePresence::Present)]);
    }

    #[test]
    fn clear_resets_to_unknown() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::DoorClosed(true));
        state.apply(&StateChange::Rssi(-60));

        state.clear();

        assert!(state.door_closed().is_none());
        assert!(state.rssi().is_none());
    }
}
