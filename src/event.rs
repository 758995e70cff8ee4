// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device events and the broadcast bus carrying them.
//!
//! Events are the trigger surface for automations: door transitions, vehicle
//! presence changes, and availability edges.

use tokio::sync::broadcast;

use crate::status::VehiclePresence;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// The door transitioned to open.
    DoorOpened,

    /// The door transitioned to closed.
    DoorClosed,

    /// Vehicle presence changed.
    VehicleChanged {
        /// The new presence value.
        presence: VehiclePresence,
    },

    /// The device became reachable or unreachable.
    AvailabilityChanged {
        /// Whether the device is now reachable.
        available: bool,
        /// Diagnostic reason when the device became unreachable.
        reason: Option<String>,
    },
}

impl DeviceEvent {
    /// Creates the door event for a closed-state transition.
    #[must_use]
    pub fn door(closed: bool) -> Self {
        if closed { Self::DoorClosed } else { Self::DoorOpened }
    }

    /// Returns `true` if this is a door transition event.
    #[must_use]
    pub fn is_door(&self) -> bool {
        matches!(self, Self::DoorOpened | Self::DoorClosed)
    }

    /// Returns `true` if this is an availability event.
    #[must_use]
    pub fn is_availability(&self) -> bool {
        matches!(self, Self::AvailabilityChanged { .. })
    }
}

/// Broadcast bus delivering [`DeviceEvent`]s to multiple subscribers.
///
/// Built on tokio's broadcast channel: each subscriber receives its own copy
/// of each event. If a slow subscriber falls more than the channel capacity
/// behind, it loses the oldest events (`RecvError::Lagged`).
///
/// # Examples
///
/// ```
/// use opengarage_lib::event::{DeviceEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
/// bus.publish(DeviceEvent::DoorOpened);
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to device events.
    ///
    /// The receiver sees all events published after the subscription is
    /// created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: DeviceEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
