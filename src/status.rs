// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed responses from the controller's status and command endpoints.

use serde::Deserialize;

/// Door position reported by the controller.
///
/// The controller models exactly two states; there is no intermediate
/// opening/closing state on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    /// The door is fully closed.
    Closed,
    /// The door is open (fully or partially).
    Open,
}

impl DoorState {
    /// Returns `true` if the door is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<u8> for DoorState {
    /// The wire encoding: `0` is closed, anything else is open.
    fn from(code: u8) -> Self {
        if code == 0 { Self::Closed } else { Self::Open }
    }
}

/// Vehicle presence reported by the distance sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehiclePresence {
    /// No vehicle detected.
    Absent,
    /// A vehicle is parked under the sensor.
    Present,
    /// Presence cannot be determined (typically while the door is open).
    Unknown,
}

impl VehiclePresence {
    /// Returns the string form used as the capability value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present => "present",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` if a vehicle is present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}

impl From<u8> for VehiclePresence {
    /// The wire encoding: `0` absent, `1` present. Any other code degrades to
    /// [`VehiclePresence::Unknown`] rather than failing the poll.
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Absent,
            1 => Self::Present,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for VehiclePresence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full status payload returned by `GET /jc`.
///
/// Fetched wholesale on every poll; the controller does not support partial
/// updates.
///
/// # Examples
///
/// ```
/// use opengarage_lib::{DoorState, StatusSnapshot};
///
/// let snapshot: StatusSnapshot =
///     serde_json::from_str(r#"{"door":0,"dist":50,"vehicle":1,"rssi":-60}"#).unwrap();
/// assert_eq!(snapshot.door_state(), DoorState::Closed);
/// assert!(snapshot.vehicle_presence().is_present());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusSnapshot {
    /// Raw door code (`0` closed, `1` open).
    pub door: u8,
    /// Distance reading from the ceiling sensor, in centimeters.
    pub dist: f64,
    /// Raw vehicle presence code.
    pub vehicle: u8,
    /// Wi-Fi signal strength in dBm.
    pub rssi: i64,
}

impl StatusSnapshot {
    /// Returns the decoded door state.
    #[must_use]
    pub fn door_state(&self) -> DoorState {
        DoorState::from(self.door)
    }

    /// Returns the decoded vehicle presence.
    #[must_use]
    pub fn vehicle_presence(&self) -> VehiclePresence {
        VehiclePresence::from(self.vehicle)
    }
}

/// Result payload returned by `GET /cc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CommandResult {
    /// Raw result code; `1` means the command was accepted.
    pub result: i64,
}

impl CommandResult {
    /// Returns `true` if the controller accepted the command.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == 1
    }
}
