// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Automation hooks: triggers, actions, and conditions.
//!
//! The [`FlowBridge`] is a thin facade over a [`Device`] for automation
//! engines. Conditions are pure reads of the cached capability values,
//! actions delegate to the command dispatcher, and triggers are the device's
//! event stream.

use tokio::sync::broadcast;

use crate::device::Device;
use crate::error::Result;
use crate::event::DeviceEvent;

/// Automation facade for a single device.
///
/// # Examples
///
/// ```no_run
/// use opengarage_lib::{ControllerSettings, Device, FlowBridge};
///
/// # async fn example() -> opengarage_lib::Result<()> {
/// let device = Device::new(ControllerSettings::new("192.168.1.50", "opendoor"))?;
/// let flows = FlowBridge::new(device.clone());
///
/// if flows.is_open() && !flows.vehicle_is_present() {
///     flows.close().await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FlowBridge {
    device: Device,
}

impl FlowBridge {
    /// Creates a bridge for the device.
    #[must_use]
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Returns the wrapped device.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    // ========== Triggers ==========

    /// Subscribes to trigger events: door open/close, vehicle presence
    /// changes, availability edges.
    #[must_use]
    pub fn triggers(&self) -> broadcast::Receiver<DeviceEvent> {
        self.device.subscribe()
    }

    // ========== Conditions ==========

    /// Condition: is the door open?
    ///
    /// An unknown door state (no successful poll yet) reads as not open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.device.state().door_closed() == Some(false)
    }

    /// Condition: is a vehicle present?
    #[must_use]
    pub fn vehicle_is_present(&self) -> bool {
        self.device
            .state()
            .vehicle()
            .is_some_and(|presence| presence.is_present())
    }

    /// Condition: does the distance reading exceed the threshold?
    #[must_use]
    pub fn height_exceeds(&self, threshold: f64) -> bool {
        self.device
            .state()
            .distance()
            .is_some_and(|distance| distance > threshold)
    }

    // ========== Actions ==========

    /// Action: open the door.
    ///
    /// # Errors
    ///
    /// Returns the underlying dispatch failure, including debounce
    /// rejection.
    pub async fn open(&self) -> Result<()> {
        self.device.set_door_closed(false).await
    }

    /// Action: close the door.
    ///
    /// # Errors
    ///
    /// Returns the underlying dispatch failure, including debounce
    /// rejection.
    pub async fn close(&self) -> Result<()> {
        self.device.set_door_closed(true).await
    }
}
