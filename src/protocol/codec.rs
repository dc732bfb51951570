// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Encoding of control requests and decoding of plaintext status replies.
//!
//! The clock speaks an ad-hoc dialect of GET query strings:
//!
//! | Purpose | Request |
//! |---------|---------|
//! | Time color | `/config?R-Time=<r>&G-Time=<g>&B-Time=<b>[&INTENSITY=<0-50>&INTENSITYviaWEB=1]` |
//! | Background color | `/config?R-Back=<r>&G-Back=<g>&B-Back=<b>[...]` |
//! | Status | `/status` → `KEY=VALUE KEY=VALUE ...` |
//! | Extra word | `/ew/?ew<id>=<0\|1>[&R=<r>&G=<g>&B=<b>]` |
//! | Extra word status | `/ewstatus/?<id>` → text containing a standalone `0` or `1` |
//!
//! Everything here is a pure function.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::types::{Brightness, Intensity, RgbColor};

/// Matches the first standalone `0` or `1` token.
static WORD_STATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[01]\b").expect("word state pattern is valid"));

/// One of the two color channels configured through `/config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Channel {
    /// The illuminated time-telling words.
    Time,
    /// The background LEDs.
    Back,
}

impl Channel {
    /// Returns the suffix used in the query keys (`R-Time`, `R-Back`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Back => "Back",
        }
    }

    /// Returns the color substituted when turning the channel on from "off".
    #[must_use]
    pub const fn default_color(&self) -> RgbColor {
        match self {
            Self::Time => RgbColor::DEFAULT_TIME,
            Self::Back => RgbColor::DEFAULT_BACKGROUND,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encodes a channel color as `R-<ch>=<r>&G-<ch>=<g>&B-<ch>=<b>`.
///
/// # Examples
///
/// ```
/// use wordclock_lib::protocol::codec::{encode_set_color, Channel};
/// use wordclock_lib::types::RgbColor;
///
/// assert_eq!(
///     encode_set_color(Channel::Back, RgbColor::new(110, 140, 255)),
///     "R-Back=110&G-Back=140&B-Back=255"
/// );
/// ```
#[must_use]
pub fn encode_set_color(channel: Channel, color: RgbColor) -> String {
    let ch = channel.as_str();
    format!(
        "R-{ch}={}&G-{ch}={}&B-{ch}={}",
        color.red(),
        color.green(),
        color.blue()
    )
}

/// Encodes a brightness as `INTENSITY=<0-50>&INTENSITYviaWEB=1`.
///
/// # Examples
///
/// ```
/// use wordclock_lib::protocol::codec::encode_set_brightness;
/// use wordclock_lib::types::Brightness;
///
/// assert_eq!(
///     encode_set_brightness(Brightness::MAX),
///     "INTENSITY=50&INTENSITYviaWEB=1"
/// );
/// ```
#[must_use]
pub fn encode_set_brightness(level: Brightness) -> String {
    format!("INTENSITY={}&INTENSITYviaWEB=1", Intensity::from(level))
}

/// Builds the full `/config` request path for a channel.
///
/// Brightness is only appended when given, so omitting it never resets the
/// clock's intensity.
#[must_use]
pub fn encode_config_path(channel: Channel, color: RgbColor, level: Option<Brightness>) -> String {
    let mut path = format!("/config?{}", encode_set_color(channel, color));
    if let Some(level) = level {
        path.push('&');
        path.push_str(&encode_set_brightness(level));
    }
    path
}

/// Builds the `/ew/` request path for an extra word.
///
/// # Examples
///
/// ```
/// use wordclock_lib::protocol::codec::encode_word_state;
/// use wordclock_lib::types::RgbColor;
///
/// assert_eq!(
///     encode_word_state(3, true, Some(RgbColor::new(10, 20, 30))),
///     "/ew/?ew3=1&R=10&G=20&B=30"
/// );
/// assert_eq!(encode_word_state(7, false, None), "/ew/?ew7=0");
/// ```
#[must_use]
pub fn encode_word_state(word_id: u32, on: bool, color: Option<RgbColor>) -> String {
    let mut path = format!("/ew/?ew{word_id}={}", u8::from(on));
    if let Some(color) = color {
        path.push_str(&format!(
            "&R={}&G={}&B={}",
            color.red(),
            color.green(),
            color.blue()
        ));
    }
    path
}

/// Builds the `/ewstatus/` request path for an extra word.
#[must_use]
pub fn encode_word_status_query(word_id: u32) -> String {
    format!("/ewstatus/?{word_id}")
}

/// Key/value pairs decoded from the `/status` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBlob {
    values: HashMap<String, String>,
}

impl StatusBlob {
    /// Returns the raw value of a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the number of decoded pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads a numeric value, clamped to `max`.
    ///
    /// A missing key reads as 0.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the value is present but not an
    /// unsigned integer.
    pub fn number(&self, key: &str, max: u8) -> Result<u8, ParseError> {
        let Some(raw) = self.get(key) else {
            return Ok(0);
        };
        let value: u32 = raw.parse().map_err(|_| ParseError::InvalidValue {
            field: key.to_string(),
            message: format!("expected an unsigned integer, got {raw:?}"),
        })?;
        Ok(u8::try_from(value.min(u32::from(max))).unwrap_or(max))
    }

    /// Reads the color of a channel (`R-<ch>`, `G-<ch>`, `B-<ch>`).
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if a component is not numeric.
    pub fn color(&self, channel: Channel) -> Result<RgbColor, ParseError> {
        let ch = channel.as_str();
        Ok(RgbColor::new(
            self.number(&format!("R-{ch}"), u8::MAX)?,
            self.number(&format!("G-{ch}"), u8::MAX)?,
            self.number(&format!("B-{ch}"), u8::MAX)?,
        ))
    }

    /// Reads `INTENSITY` and converts it to the entity-facing scale.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the value is not numeric.
    pub fn brightness(&self) -> Result<Brightness, ParseError> {
        let raw = self.number("INTENSITY", Intensity::MAX.value())?;
        Ok(Brightness::from(Intensity::clamped(raw)))
    }
}

/// Tokenizes whitespace-separated `KEY=VALUE` pairs.
///
/// Tokens without `=` are ignored; a repeated key keeps its last value.
///
/// # Examples
///
/// ```
/// use wordclock_lib::protocol::codec::decode_status_blob;
///
/// let blob = decode_status_blob("R-Time=12 G-Time=0 INTENSITY=25");
/// assert_eq!(blob.get("R-Time"), Some("12"));
/// assert_eq!(blob.number("B-Time", 255).unwrap(), 0);
/// ```
#[must_use]
pub fn decode_status_blob(text: &str) -> StatusBlob {
    let values = text
        .split_whitespace()
        .filter_map(|token| token.split_once('='))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    StatusBlob { values }
}

/// Finds the first standalone `0` or `1` in a word status reply.
///
/// The match is on word boundaries, so `"10"` does not count while
/// `"state: 1"` does. If the clock ever adds other single-digit tokens to
/// this reply the first one wins.
///
/// # Errors
///
/// Returns `ParseError::UnexpectedFormat` if no such token exists.
///
/// # Examples
///
/// ```
/// use wordclock_lib::protocol::codec::decode_word_state;
///
/// assert_eq!(decode_word_state("1\n").unwrap(), true);
/// assert!(decode_word_state("GARBAGE DATA").is_err());
/// ```
pub fn decode_word_state(text: &str) -> Result<bool, ParseError> {
    WORD_STATE_PATTERN
        .find(text)
        .map(|m| m.as_str() == "1")
        .ok_or_else(|| ParseError::UnexpectedFormat("unexpected word-status format".to_string()))
}

/// Infers the on/off state of a channel from its color.
#[must_use]
pub const fn derive_on_state_from_color(color: RgbColor) -> bool {
    !color.is_off()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str =
        "R-Time=0 G-Time=0 B-Time=0 R-Back=110 G-Back=140 B-Back=255 INTENSITY=25";

    #[test]
    fn encode_time_color() {
        assert_eq!(
            encode_set_color(Channel::Time, RgbColor::new(255, 0, 0)),
            "R-Time=255&G-Time=0&B-Time=0"
        );
    }

    #[test]
    fn config_path_without_brightness() {
        assert_eq!(
            encode_config_path(Channel::Time, RgbColor::new(1, 2, 3), None),
            "/config?R-Time=1&G-Time=2&B-Time=3"
        );
    }

    #[test]
    fn config_path_with_brightness() {
        assert_eq!(
            encode_config_path(
                Channel::Back,
                RgbColor::new(1, 2, 3),
                Some(Brightness::new(128))
            ),
            "/config?R-Back=1&G-Back=2&B-Back=3&INTENSITY=25&INTENSITYviaWEB=1"
        );
    }

    #[test]
    fn encode_word_on_with_color() {
        assert_eq!(
            encode_word_state(3, true, Some(RgbColor::new(10, 20, 30))),
            "/ew/?ew3=1&R=10&G=20&B=30"
        );
    }

    #[test]
    fn encode_word_off() {
        assert_eq!(encode_word_state(12, false, None), "/ew/?ew12=0");
    }

    #[test]
    fn encode_word_status() {
        assert_eq!(encode_word_status_query(4), "/ewstatus/?4");
    }

    #[test]
    fn decode_full_status() {
        let blob = decode_status_blob(STATUS);
        assert_eq!(blob.len(), 7);
        assert_eq!(blob.color(Channel::Time).unwrap(), RgbColor::OFF);
        assert_eq!(
            blob.color(Channel::Back).unwrap(),
            RgbColor::new(110, 140, 255)
        );
        let brightness = blob.brightness().unwrap().value();
        assert!((126..=128).contains(&brightness));
    }

    #[test]
    fn decode_missing_keys_default_to_zero() {
        let blob = decode_status_blob("G-Time=40 B-Time=50");
        assert_eq!(blob.number("R-Time", 255).unwrap(), 0);
        assert_eq!(blob.color(Channel::Time).unwrap(), RgbColor::new(0, 40, 50));
        assert_eq!(blob.brightness().unwrap(), Brightness::MIN);
    }

    #[test]
    fn decode_ignores_unknown_and_malformed_tokens() {
        let blob = decode_status_blob("hello WIFI=ok =7 R-Time=9");
        assert_eq!(blob.get("WIFI"), Some("ok"));
        assert_eq!(blob.get(""), None);
        assert_eq!(blob.number("R-Time", 255).unwrap(), 9);
    }

    #[test]
    fn decode_empty_status() {
        let blob = decode_status_blob("");
        assert!(blob.is_empty());
        assert_eq!(blob.color(Channel::Back).unwrap(), RgbColor::OFF);
    }

    #[test]
    fn decode_clamps_large_values() {
        let blob = decode_status_blob("R-Back=300 INTENSITY=99");
        assert_eq!(blob.number("R-Back", 255).unwrap(), 255);
        assert_eq!(blob.brightness().unwrap(), Brightness::MAX);
    }

    #[test]
    fn decode_rejects_non_numeric_values() {
        let blob = decode_status_blob("R-Time=abc");
        let err = blob.color(Channel::Time).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "R-Time"));
    }

    #[test]
    fn word_state_plain_values() {
        assert!(decode_word_state("1").unwrap());
        assert!(!decode_word_state("0").unwrap());
        assert!(decode_word_state("  1\r\n").unwrap());
    }

    #[test]
    fn word_state_takes_first_standalone_token() {
        assert!(!decode_word_state("ew3 state 0").unwrap());
        assert!(decode_word_state("10 11 1 0").unwrap());
    }

    #[test]
    fn word_state_rejects_garbage() {
        assert_eq!(
            decode_word_state("GARBAGE DATA"),
            Err(ParseError::UnexpectedFormat(
                "unexpected word-status format".to_string()
            ))
        );
        assert!(decode_word_state("").is_err());
        assert!(decode_word_state("101").is_err());
    }

    #[test]
    fn on_state_from_color() {
        assert!(!derive_on_state_from_color(RgbColor::new(0, 0, 0)));
        assert!(derive_on_state_from_color(RgbColor::new(0, 0, 1)));
        assert!(derive_on_state_from_color(RgbColor::new(255, 255, 255)));
    }

    #[test]
    fn channel_defaults() {
        assert_eq!(Channel::Time.default_color(), RgbColor::new(255, 0, 0));
        assert_eq!(Channel::Back.default_color(), RgbColor::DEFAULT_BACKGROUND);
        assert_eq!(Channel::Back.to_string(), "Back");
    }
}
