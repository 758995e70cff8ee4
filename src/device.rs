// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device adapter for an `OpenGarage` controller.
//!
//! The [`Device`] polls the controller's status endpoint on a fixed cadence,
//! reconciles each snapshot into cached capability values, and dispatches
//! open/close commands. State transitions are published on the device's
//! [`EventBus`](crate::event::EventBus).
//!
//! # Polling and commands
//!
//! Polling is a single self-rescheduling task; at most one pending poll
//! exists at a time. A successful door command cancels the pending poll and
//! resumes polling only after the configured open/close time, because the
//! door is known to be transitioning and an earlier poll would observe a
//! stale or intermediate state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::capability::CapabilitySet;
use crate::command::DoorCommand;
use crate::error::{DeviceError, Error, Result};
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::HttpClient;
use crate::settings::ControllerSettings;
use crate::state::{DeviceState, StateChange};
use crate::status::StatusSnapshot;

/// A single `OpenGarage` garage-door device.
///
/// Cloning is cheap; clones share the same underlying state, event bus, and
/// poll task.
///
/// # Examples
///
/// ```no_run
/// use opengarage_lib::{ControllerSettings, Device};
///
/// #[tokio::main]
/// async fn main() -> opengarage_lib::Result<()> {
///     let settings = ControllerSettings::new("192.168.1.50", "opendoor");
///     let device = Device::new(settings)?;
///
///     device.migrate();
///     device.start_polling();
///
///     // Close the door
///     device.set_door_closed(true).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Device {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: HttpClient,
    settings: ControllerSettings,
    state: RwLock<DeviceState>,
    capabilities: RwLock<CapabilitySet>,
    events: EventBus,
    /// Reachability; devices start out presumed reachable, the first failed
    /// poll flips this.
    available: RwLock<Availability>,
    /// Re-entrancy guard for the poll cycle.
    is_polling: AtomicBool,
    /// Instant of the last issued door command, for the debounce window.
    last_command: Mutex<Option<Instant>>,
    /// The single outstanding poll task, aborted before rearming.
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Debug)]
struct Availability {
    available: bool,
    reason: Option<String>,
}

impl Device {
    /// Further door commands are rejected for this long after one is issued.
    pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);

    /// Creates a device for the given controller settings.
    ///
    /// The capability set starts as [`CapabilitySet::standard`]; use
    /// [`Device::with_capabilities`] to start from a persisted set and run
    /// [`Device::migrate`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if the settings are invalid or the HTTP client cannot
    /// be created.
    pub fn new(settings: ControllerSettings) -> Result<Self> {
        Self::with_capabilities(settings, CapabilitySet::standard())
    }

    /// Creates a device with an explicit starting capability set.
    ///
    /// # Errors
    ///
    /// Returns error if the settings are invalid or the HTTP client cannot
    /// be created.
    pub fn with_capabilities(
        settings: ControllerSettings,
        capabilities: CapabilitySet,
    ) -> Result<Self> {
        settings.validate().map_err(Error::Value)?;
        let client = HttpClient::new(&settings).map_err(Error::Protocol)?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                settings,
                state: RwLock::new(DeviceState::new()),
                capabilities: RwLock::new(capabilities),
                events: EventBus::new(),
                available: RwLock::new(Availability {
                    available: true,
                    reason: None,
                }),
                is_polling: AtomicBool::new(false),
                last_command: Mutex::new(None),
                poll_task: Mutex::new(None),
            }),
        })
    }

    /// Returns the controller settings.
    #[must_use]
    pub fn settings(&self) -> &ControllerSettings {
        &self.inner.settings
    }

    /// Returns a snapshot of the cached capability values.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.inner.state.read().clone()
    }

    /// Returns a copy of the capability set.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        self.inner.capabilities.read().clone()
    }

    /// Returns `true` if the device is currently reachable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.available.read().available
    }

    /// Returns the reason recorded by the last failed poll, if the device is
    /// unreachable.
    #[must_use]
    pub fn unavailable_reason(&self) -> Option<String> {
        self.inner.available.read().reason.clone()
    }

    /// Subscribes to device events (door transitions, vehicle presence,
    /// availability edges).
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<DeviceEvent> {
        self.inner.events.subscribe()
    }

    /// Applies the one-time startup corrections to the capability set.
    ///
    /// Idempotent; see [`CapabilitySet::migrate`]. Returns `true` if anything
    /// was corrected.
    pub fn migrate(&self) -> bool {
        let changed = self.inner.capabilities.write().migrate();
        if changed {
            tracing::info!("capability migration applied");
        }
        changed
    }

    // ========== Polling ==========

    /// Starts the poll loop with an immediate first poll.
    ///
    /// If polling is already running, the pending poll is cancelled and
    /// polling restarts immediately.
    pub fn start_polling(&self) {
        self.schedule_poll(Duration::ZERO);
    }

    /// Stops the poll loop. A poll already in flight is not interrupted,
    /// only its next scheduling is cancelled.
    pub fn stop_polling(&self) {
        if let Some(handle) = self.inner.poll_task.lock().take() {
            handle.abort();
        }
    }

    /// Returns `true` if a poll task is armed.
    #[must_use]
    pub fn is_polling_scheduled(&self) -> bool {
        self.inner.poll_task.lock().is_some()
    }

    /// Cancels the pending poll and rearms the loop to fire after `delay`,
    /// then continue at the configured polling rate.
    fn schedule_poll(&self, delay: Duration) {
        let weak = Arc::downgrade(&self.inner);
        let rate = self.inner.settings.polling_rate();

        let mut slot = self.inner.poll_task.lock();
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            loop {
                let Some(inner) = weak.upgrade() else { return };
                if let Err(e) = inner.poll_cycle().await {
                    tracing::warn!(error = %e, "poll failed");
                }
                drop(inner);
                tokio::time::sleep(rate).await;
            }
        }));
    }

    /// Runs one poll cycle immediately.
    ///
    /// Re-entrancy guarded: a call while another poll is outstanding is a
    /// no-op. On success the snapshot is reconciled and the device is marked
    /// reachable; on failure the device is marked unreachable with the error
    /// as the reason. The in-flight flag is always cleared.
    ///
    /// # Errors
    ///
    /// Returns the underlying protocol error when the status fetch fails.
    pub async fn poll_once(&self) -> Result<()> {
        self.inner.poll_cycle().await
    }

    /// Reconciles a status snapshot into the cached capability values.
    ///
    /// Only fields whose value differs from the cache are written. A door
    /// transition publishes [`DeviceEvent::DoorClosed`] or
    /// [`DeviceEvent::DoorOpened`]; a vehicle presence change publishes
    /// [`DeviceEvent::VehicleChanged`]. Distance and signal strength are
    /// pass-through writes with no events.
    pub fn apply_snapshot(&self, snapshot: &StatusSnapshot) {
        self.inner.apply_snapshot(snapshot);
    }

    // ========== Commands ==========

    /// Sends a door command to the controller.
    ///
    /// On success the pending poll is cancelled and polling resumes after
    /// the configured open/close time. No retry, no backoff.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::CommandRejected`] with the raw result code if
    /// the controller did not accept the command, or a protocol error on
    /// network/HTTP failure.
    pub async fn send_door_command(&self, command: DoorCommand) -> Result<()> {
        let result = self
            .inner
            .client
            .send_command(command)
            .await
            .map_err(Error::Protocol)?;

        if !result.is_success() {
            return Err(Error::Device(DeviceError::CommandRejected {
                code: result.result,
            }));
        }

        tracing::debug!(command = %command, "door command accepted");

        // The door is now transitioning; polling before open_close_time
        // elapses would read a stale or intermediate state.
        if self.is_polling_scheduled() {
            self.schedule_poll(self.inner.settings.open_close_time());
        }

        Ok(())
    }

    /// Requests a door state change; the capability-change entry point.
    ///
    /// Rejects immediately if a command was issued within the last second
    /// (the request never reaches the network). Otherwise arms the debounce
    /// window, dispatches the matching command, and fires the deprecated
    /// door-open/door-close trigger pair for backward compatibility.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::DebounceActive`] inside the debounce window,
    /// or the underlying command failure.
    pub async fn set_door_closed(&self, to_closed: bool) -> Result<()> {
        {
            let mut last = self.inner.last_command.lock();
            if let Some(at) = *last
                && at.elapsed() < Self::DEBOUNCE_WINDOW
            {
                return Err(Error::Device(DeviceError::DebounceActive));
            }
            *last = Some(Instant::now());
        }

        self.send_door_command(DoorCommand::for_target(to_closed))
            .await?;

        // Deprecated trigger pair, kept for older automations; the
        // confirming poll fires the same event again once the transition
        // is observed.
        self.inner.events.publish(DeviceEvent::door(to_closed));

        Ok(())
    }
}

impl Inner {
    async fn poll_cycle(&self) -> Result<()> {
        if self.is_polling.swap(true, Ordering::SeqCst) {
            // A poll is already outstanding.
            return Ok(());
        }

        let outcome = self.client.fetch_status().await;
        let result = match outcome {
            Ok(snapshot) => {
                self.apply_snapshot(&snapshot);
                self.mark_available();
                Ok(())
            }
            Err(e) => {
                self.mark_unavailable(e.to_string());
                Err(Error::Protocol(e))
            }
        };

        self.is_polling.store(false, Ordering::SeqCst);
        result
    }

    fn apply_snapshot(&self, snapshot: &StatusSnapshot) {
        let changes = self.state.read().diff_snapshot(snapshot);

        for change in changes {
            let applied = self.state.write().apply(&change);
            if !applied {
                continue;
            }
            match change {
                StateChange::DoorClosed(closed) => {
                    tracing::info!(closed, "door state changed");
                    self.events.publish(DeviceEvent::door(closed));
                }
                StateChange::Vehicle(presence) => {
                    tracing::info!(presence = %presence, "vehicle presence changed");
                    self.events.publish(DeviceEvent::VehicleChanged { presence });
                }
                StateChange::Distance(_) | StateChange::Rssi(_) => {}
            }
        }
    }

    fn mark_available(&self) {
        let mut availability = self.available.write();
        if !availability.available {
            availability.available = true;
            availability.reason = None;
            drop(availability);
            tracing::info!("device became reachable");
            self.events.publish(DeviceEvent::AvailabilityChanged {
                available: true,
                reason: None,
            });
        }
    }

    fn mark_unavailable(&self, reason: String) {
        let mut availability = self.available.write();
        if availability.available {
            availability.available = false;
            availability.reason = Some(reason.clone());
            drop(availability);
            tracing::warn!(reason = %reason, "device became unreachable");
            self.events.publish(DeviceEvent::AvailabilityChanged {
                available: false,
                reason: Some(reason),
            });
        } else {
            availability.reason = Some(reason);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.poll_task.lock().take() {
            handle.abort();
        }
    }
}
