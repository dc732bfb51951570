// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type for the clock's LED channels.
//!
//! The clock has no separate power flag for its time and background LEDs:
//! a channel showing `(0, 0, 0)` is considered off. [`RgbColor::is_off`]
//! encodes that convention.

use std::fmt;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use wordclock_lib::types::RgbColor;
///
/// let color = RgbColor::new(110, 140, 255);
/// assert_eq!(color.red(), 110);
/// assert_eq!(color.green(), 140);
/// assert_eq!(color.blue(), 255);
/// assert!(!color.is_off());
///
/// assert!(RgbColor::OFF.is_off());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// The "off" sentinel: all channels zero.
    pub const OFF: Self = Self::new(0, 0, 0);

    /// Default color of the time light.
    pub const DEFAULT_TIME: Self = Self::new(255, 0, 0);

    /// Default color of the background light (light blue).
    pub const DEFAULT_BACKGROUND: Self = Self::new(173, 216, 230);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a color from arbitrary integers, clamping each to [0, 255].
    ///
    /// # Examples
    ///
    /// ```
    /// use wordclock_lib::types::RgbColor;
    ///
    /// let color = RgbColor::clamped(-20, 128, 300);
    /// assert_eq!(color, RgbColor::new(0, 128, 255));
    /// ```
    #[must_use]
    pub fn clamped(red: i64, green: i64, blue: i64) -> Self {
        Self::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns `true` if all three components are exactly zero.
    #[must_use]
    pub const fn is_off(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }

    /// Returns the color as a hex string with the hash prefix.
    #[must_use]
    pub fn to_hex_with_hash(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::OFF
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_with_hash())
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<RgbColor> for (u8, u8, u8) {
    fn from(color: RgbColor) -> Self {
        (color.red, color.green, color.blue)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(value: i64) -> u8 {
    // Safe: clamped to the u8 range first
    value.clamp(0, 255) as u8
}
