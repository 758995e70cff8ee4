// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability slots and the startup migration.
//!
//! A capability is a named value slot representing one observable or
//! controllable device attribute. The set of exposed slots is corrected once
//! at startup by [`CapabilitySet::migrate`]; the corrections are idempotent.

/// Identifier of a capability slot exposed by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Whether the garage door is closed (settable).
    GarageDoorClosed,
    /// Distance reading from the ceiling sensor, in centimeters.
    MeasureDistance,
    /// Vehicle presence as a string value.
    VehicleState,
    /// Wi-Fi signal strength in dBm.
    MeasureRssi,
    /// Deprecated free-form door state, removed by migration.
    DoorState,
}

impl Capability {
    /// Returns the capability identifier string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GarageDoorClosed => "garagedoor_closed",
            Self::MeasureDistance => "measure_distance",
            Self::VehicleState => "vehicle_state",
            Self::MeasureRssi => "measure_rssi",
            Self::DoorState => "door_state",
        }
    }
}

/// Device class category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    /// Door-type device (the correct class for a garage door).
    Door,
    /// Any other class, corrected by migration.
    #[default]
    Other,
}

/// The set of capability slots a device exposes, plus its class.
///
/// # Examples
///
/// ```
/// use opengarage_lib::{Capability, CapabilitySet, DeviceClass};
///
/// let mut caps = CapabilitySet::legacy();
/// assert!(caps.has(Capability::DoorState));
///
/// let changed = caps.migrate();
/// assert!(changed);
/// assert!(caps.has(Capability::GarageDoorClosed));
/// assert!(!caps.has(Capability::DoorState));
/// assert_eq!(caps.device_class(), DeviceClass::Door);
///
/// // Re-running is a no-op
/// assert!(!caps.migrate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    capabilities: Vec<Capability>,
    device_class: DeviceClass,
}

impl CapabilitySet {
    /// Creates the current capability set for an `OpenGarage` device.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            capabilities: vec![
                Capability::GarageDoorClosed,
                Capability::MeasureDistance,
                Capability::VehicleState,
                Capability::MeasureRssi,
            ],
            device_class: DeviceClass::Door,
        }
    }

    /// Creates the capability set of a device installed before the
    /// `garagedoor_closed` slot existed.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            capabilities: vec![
                Capability::DoorState,
                Capability::MeasureDistance,
                Capability::VehicleState,
                Capability::MeasureRssi,
            ],
            device_class: DeviceClass::Other,
        }
    }

    /// Returns `true` if the set contains the capability.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Adds a capability if absent. Returns `true` if it was added.
    pub fn add(&mut self, capability: Capability) -> bool {
        if self.has(capability) {
            false
        } else {
            self.capabilities.push(capability);
            true
        }
    }

    /// Removes a capability if present. Returns `true` if it was removed.
    pub fn remove(&mut self, capability: Capability) -> bool {
        let before = self.capabilities.len();
        self.capabilities.retain(|c| *c != capability);
        self.capabilities.len() != before
    }

    /// Returns the device class.
    #[must_use]
    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    /// Sets the device class.
    pub fn set_device_class(&mut self, class: DeviceClass) {
        self.device_class = class;
    }

    /// Returns the capability names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.capabilities.iter().map(Capability::name).collect()
    }

    /// Applies the one-time startup corrections.
    ///
    /// Ensures `garagedoor_closed` is exposed, removes the deprecated
    /// `door_state` slot, and corrects the device class to
    /// [`DeviceClass::Door`]. Each step checks current state before acting,
    /// so re-running is always safe.
    ///
    /// Returns `true` if anything was changed.
    pub fn migrate(&mut self) -> bool {
        let mut changed = self.add(Capability::GarageDoorClosed);
        changed |= self.remove(Capability::DoorState);
        if self.device_class != DeviceClass::Door {
            self.device_class = DeviceClass::Door;
            changed = true;
        }
        changed
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_contents() {
        let caps = CapabilitySet::standard();
        assert!(caps.has(Capability::GarageDoorClosed));
        assert!(caps.has(Capability::MeasureDistance));
        assert!(caps.has(Capability::VehicleState));
        assert!(caps.has(Capability::MeasureRssi));
        assert!(!caps.has(Capability::DoorState));
        assert_eq!(caps.device_class(), DeviceClass::Door);
    }

    #[test]
    fn add_is_idempotent() {
        let mut caps = CapabilitySet::standard();
        assert!(!caps.add(Capability::GarageDoorClosed));
        assert_eq!(caps.names().len(), 4);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut caps = CapabilitySet::standard();
        assert!(!caps.remove(Capability::DoorState));
    }

    #[test]
    fn migrate_corrects_legacy_set() {
        let mut caps = CapabilitySet::legacy();
        assert!(caps.migrate());

        assert!(caps.has(Capability::GarageDoorClosed));
        assert!(!caps.has(Capability::DoorState));
        assert_eq!(caps.device_class(), DeviceClass::Door);
    }

    #[test]
    fn migrate_is_idempotent() {
        let mut caps = CapabilitySet::legacy();
        assert!(caps.migrate());
        assert!(!caps.migrate());
        assert!(!caps.migrate());
    }

    #[test]
    fn migrate_on_standard_set_is_noop() {
        let mut caps = CapabilitySet::standard();
        assert!(!caps.migrate());
    }

    #[test]
    fn capability_names() {
        assert_eq!(Capability::GarageDoorClosed.name(), "garagedoor_closed");
        assert_eq!(Capability::MeasureDistance.name(), "measure_distance");
        assert_eq!(Capability::VehicleState.name(), "vehicle_state");
        assert_eq!(Capability::MeasureRssi.name(), "measure_rssi");
        assert_eq!(Capability::DoorState.name(), "door_state");
    }
}
