// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `OpenGarage` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! settings validation, HTTP communication, JSON parsing, and device
//! operations.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during settings validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during HTTP communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a controller response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to settings validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The polling rate must be non-zero.
    #[error("polling rate must be greater than zero")]
    ZeroPollingRate,

    /// The open/close transition time must be non-zero.
    #[error("open/close time must be greater than zero")]
    ZeroOpenCloseTime,

    /// The device key must not be empty.
    #[error("device key must not be empty")]
    EmptyDeviceKey,
}

/// Errors related to HTTP communication with the controller.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the controller failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid host or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing controller responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to device operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Command was rejected by the controller with a non-success result code.
    #[error("command rejected with result code {code}")]
    CommandRejected {
        /// The raw result code returned by the controller.
        code: i64,
    },

    /// A command was issued within the debounce window of a previous one.
    #[error("command ignored: a door command was issued less than a second ago")]
    DebounceActive,

    /// The device is currently unreachable.
    #[error("device unavailable: {reason}")]
    Unavailable {
        /// Diagnostic reason recorded by the last failed poll.
        reason: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
