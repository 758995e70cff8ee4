// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device settings for an `OpenGarage` controller.

use std::time::Duration;

use crate::error::ValueError;

/// Settings for an `OpenGarage` controller.
///
/// Holds the connection parameters and timing configuration for a single
/// controller. Settings are read on every request and do not change during
/// a single operation.
///
/// # Examples
///
/// ```
/// use opengarage_lib::ControllerSettings;
/// use std::time::Duration;
///
/// // Minimal configuration
/// let settings = ControllerSettings::new("192.168.1.50", "opendoor");
///
/// // With all options
/// let settings = ControllerSettings::new("192.168.1.50", "opendoor")
///     .with_port(8080)
///     .with_polling_rate(Duration::from_secs(5))
///     .with_open_close_time(Duration::from_secs(20));
/// ```
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    host: String,
    port: u16,
    device_key: String,
    polling_rate: Duration,
    open_close_time: Duration,
}

impl ControllerSettings {
    /// Default HTTP port of the controller firmware.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default interval between status polls.
    pub const DEFAULT_POLLING_RATE: Duration = Duration::from_secs(10);
    /// Default time the door takes to fully open or close.
    pub const DEFAULT_OPEN_CLOSE_TIME: Duration = Duration::from_secs(15);

    /// Creates settings for the specified host and device key.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the controller
    /// * `device_key` - The device key configured on the controller
    #[must_use]
    pub fn new(host: impl Into<String>, device_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            device_key: device_key.into(),
            polling_rate: Self::DEFAULT_POLLING_RATE,
            open_close_time: Self::DEFAULT_OPEN_CLOSE_TIME,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the interval between status polls.
    #[must_use]
    pub fn with_polling_rate(mut self, rate: Duration) -> Self {
        self.polling_rate = rate;
        self
    }

    /// Sets the time the door takes to fully open or close.
    ///
    /// Polling is suspended for this long after a successful command, since
    /// an earlier poll would observe a mid-transition state.
    #[must_use]
    pub fn with_open_close_time(mut self, time: Duration) -> Self {
        self.open_close_time = time;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the device key.
    #[must_use]
    pub fn device_key(&self) -> &str {
        &self.device_key
    }

    /// Returns the polling rate.
    #[must_use]
    pub fn polling_rate(&self) -> Duration {
        self.polling_rate
    }

    /// Returns the open/close transition time.
    #[must_use]
    pub fn open_close_time(&self) -> Duration {
        self.open_close_time
    }

    /// Builds the base URL from these settings.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.port == Self::DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if the device key is empty or either duration
    /// is zero.
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.device_key.is_empty() {
            return Err(ValueError::EmptyDeviceKey);
        }
        if self.polling_rate.is_zero() {
            return Err(ValueError::ZeroPollingRate);
        }
        if self.open_close_time.is_zero() {
            return Err(ValueError::ZeroOpenCloseTime);
        }
        Ok(())
    }
}
