// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `OpenGarage` Lib - A Rust library to control `OpenGarage` door controllers.
//!
//! This library provides an async API for a single `OpenGarage` device: it
//! polls the controller's HTTP status endpoint, reconciles each snapshot into
//! cached capability values, dispatches open/close commands, and exposes
//! automation hooks (triggers, actions, conditions).
//!
//! # Supported Features
//!
//! - **Door control**: Open/close commands with a 1-second debounce window
//! - **Status polling**: Self-rescheduling poll loop with change detection
//! - **Sensor readings**: Distance, vehicle presence, Wi-Fi signal strength
//! - **Automation hooks**: Trigger events, action handlers, condition
//!   predicates via [`FlowBridge`]
//!
//! # Quick Start
//!
//! ```no_run
//! use opengarage_lib::{ControllerSettings, Device};
//!
//! #[tokio::main]
//! async fn main() -> opengarage_lib::Result<()> {
//!     let settings = ControllerSettings::new("192.168.1.50", "opendoor");
//!     let device = Device::new(settings)?;
//!
//!     // One-time idempotent capability corrections
//!     device.migrate();
//!
//!     // Watch for door transitions
//!     let mut events = device.subscribe();
//!
//!     device.start_polling();
//!     device.set_door_closed(true).await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Automation Hooks
//!
//! ```no_run
//! use opengarage_lib::{ControllerSettings, Device, FlowBridge};
//!
//! # async fn example() -> opengarage_lib::Result<()> {
//! let device = Device::new(ControllerSettings::new("192.168.1.50", "opendoor"))?;
//! let flows = FlowBridge::new(device);
//!
//! // Condition: close the door at night if nobody parked under the sensor
//! if flows.is_open() && !flows.vehicle_is_present() {
//!     flows.close().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod capability;
mod command;
mod device;
pub mod error;
pub mod event;
mod flow;
pub mod protocol;
mod settings;
pub mod state;
mod status;

pub use capability::{Capability, CapabilitySet, DeviceClass};
pub use command::DoorCommand;
pub use device::Device;
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, EventBus};
pub use flow::FlowBridge;
pub use protocol::HttpClient;
pub use settings::ControllerSettings;
pub use state::{DeviceState, StateChange};
pub use status::{CommandResult, DoorState, StatusSnapshot, VehiclePresence};
