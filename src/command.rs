// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door command definitions.
//!
//! The `OpenGarage` controller accepts exactly two commands, sent as query
//! flags on the `/cc` endpoint: `open=1` and `close=1`.

/// A command that can be sent to the controller's command endpoint.
///
/// # Examples
///
/// ```
/// use opengarage_lib::DoorCommand;
///
/// let cmd = DoorCommand::Close;
/// assert_eq!(cmd.query_flag(), "close");
/// assert!(cmd.targets_closed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    /// Open the door.
    Open,
    /// Close the door.
    Close,
}

impl DoorCommand {
    /// Returns the command for the requested target state.
    ///
    /// `to_closed == true` yields [`DoorCommand::Close`].
    #[must_use]
    pub fn for_target(to_closed: bool) -> Self {
        if to_closed { Self::Close } else { Self::Open }
    }

    /// Returns the query flag name used on the command endpoint.
    #[must_use]
    pub fn query_flag(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }

    /// Returns `true` if this command drives the door towards closed.
    #[must_use]
    pub fn targets_closed(&self) -> bool {
        matches!(self, Self::Close)
    }
}

impl std::fmt::Display for DoorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.query_flag())
    }
}
