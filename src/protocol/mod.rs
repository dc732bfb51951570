// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocol of the WordClock.
//!
//! - [`codec`]: pure encoding of requests and decoding of plaintext replies
//! - [`HttpClient`]: one GET per call over a pooled HTTP client
//!
//! # Examples
//!
//! ```
//! use wordclock_lib::protocol::Request;
//! use wordclock_lib::protocol::codec::Channel;
//! use wordclock_lib::types::RgbColor;
//!
//! let request = Request::SetColor {
//!     channel: Channel::Time,
//!     color: RgbColor::new(255, 0, 0),
//!     brightness: None,
//! };
//! assert_eq!(request.path(), "/config?R-Time=255&G-Time=0&B-Time=0");
//! ```

pub mod codec;
mod http;

pub use http::{HttpClient, HttpConfig};

use crate::types::{Brightness, RgbColor};
use codec::Channel;

/// A request understood by the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Set the color (and optionally the brightness) of a channel.
    SetColor {
        /// Target channel.
        channel: Channel,
        /// Color to show; `(0, 0, 0)` switches the channel off.
        color: RgbColor,
        /// Brightness, only sent when present.
        brightness: Option<Brightness>,
    },
    /// Read the plaintext status of both channels.
    Status,
    /// Switch an extra word on or off.
    SetWord {
        /// Word identifier.
        word_id: u32,
        /// Desired state.
        on: bool,
        /// Optional color for the word.
        color: Option<RgbColor>,
    },
    /// Read the state of an extra word.
    WordStatus {
        /// Word identifier.
        word_id: u32,
    },
}

impl Request {
    /// Returns the request path including the query string.
    #[must_use]
    pub fn path(&self) -> String {
        match *self {
            Self::SetColor {
                channel,
                color,
                brightness,
            } => codec::encode_config_path(channel, color, brightness),
            Self::Status => "/status".to_string(),
            Self::SetWord { word_id, on, color } => codec::encode_word_state(word_id, on, color),
            Self::WordStatus { word_id } => codec::encode_word_status_query(word_id),
        }
    }
}

/// Successful reply from the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResponse {
    body: String,
}

impl DeviceResponse {
    /// Creates a response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the plaintext body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_path() {
        assert_eq!(Request::Status.path(), "/status");
    }

    #[test]
    fn word_paths() {
        let set = Request::SetWord {
            word_id: 3,
            on: true,
            color: Some(RgbColor::new(10, 20, 30)),
        };
        assert_eq!(set.path(), "/ew/?ew3=1&R=10&G=20&B=30");
        assert_eq!(Request::WordStatus { word_id: 3 }.path(), "/ewstatus/?3");
    }

    #[test]
    fn set_color_with_brightness() {
        let request = Request::SetColor {
            channel: Channel::Back,
            color: RgbColor::OFF,
            brightness: Some(Brightness::MAX),
        };
        assert_eq!(
            request.path(),
            "/config?R-Back=0&G-Back=0&B-Back=0&INTENSITY=50&INTENSITYviaWEB=1"
        );
    }
}
