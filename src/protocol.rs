// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for the `OpenGarage` controller.
//!
//! The controller exposes two unauthenticated-transport endpoints:
//!
//! - `GET /jc` - the full status snapshot
//! - `GET /cc?dkey={key}&{open|close}=1` - door commands, gated by the
//!   device key

use std::time::Duration;

use reqwest::Client;

use crate::command::DoorCommand;
use crate::error::{ParseError, ProtocolError};
use crate::settings::ControllerSettings;
use crate::status::{CommandResult, StatusSnapshot};

/// HTTP client for a single `OpenGarage` controller.
///
/// Stateless: each call is an independent GET request. The base URL and
/// device key are fixed at construction from [`ControllerSettings`].
///
/// # Examples
///
/// ```no_run
/// use opengarage_lib::{ControllerSettings, HttpClient};
///
/// # async fn example() -> opengarage_lib::Result<()> {
/// let settings = ControllerSettings::new("192.168.1.50", "opendoor");
/// let client = HttpClient::new(&settings)?;
/// let snapshot = client.fetch_status().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    device_key: String,
    client: Client,
}

impl HttpClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a client for the controller described by the settings.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be created.
    pub fn new(settings: &ControllerSettings) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url: settings.base_url(),
            device_key: settings.device_key().to_string(),
            client,
        })
    }

    /// Returns the base URL of the controller.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the status endpoint URL.
    fn status_url(&self) -> String {
        format!("{}/jc", self.base_url)
    }

    /// Builds the command endpoint URL for a door command.
    fn command_url(&self, command: DoorCommand) -> String {
        format!(
            "{}/cc?dkey={}&{}=1",
            self.base_url,
            urlencoding::encode(&self.device_key),
            command.query_flag()
        )
    }

    /// Fetches the full status snapshot from `/jc`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] on network/HTTP failure.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, ProtocolError> {
        let body = self.get(&self.status_url()).await?;
        serde_json::from_str(&body)
            .map_err(|e| ProtocolError::ConnectionFailed(format!("invalid status payload: {e}")))
    }

    /// Sends a door command via `/cc` and returns the raw result.
    ///
    /// The caller interprets the result code; this method only fails on
    /// transport or payload errors.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] on network/HTTP failure or an unparseable
    /// payload.
    pub async fn send_command(&self, command: DoorCommand) -> Result<CommandResult, ProtocolError> {
        let body = self.get(&self.command_url(command)).await?;
        serde_json::from_str(&body)
            .map_err(|e| ProtocolError::ConnectionFailed(format!("invalid command payload: {e}")))
    }

    async fn get(&self, url: &str) -> Result<String, ProtocolError> {
        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received HTTP response");

        Ok(body)
    }
}

/// Parses a raw status payload without a client.
///
/// Useful for feeding recorded payloads through the reconciliation path.
///
/// # Errors
///
/// Returns [`ParseError`] if the payload is not a valid snapshot.
pub fn parse_status(body: &str) -> Result<StatusSnapshot, ParseError> {
    serde_json::from_str(body).map_err(ParseError::Json)
}
