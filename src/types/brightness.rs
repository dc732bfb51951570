// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness types.
//!
//! Entities expose brightness on a 0-255 scale ([`Brightness`]) while the
//! clock itself works with an `INTENSITY` of 0-50 ([`Intensity`]). The two
//! scales are converted with rounding in both directions, so a round trip
//! may be off by a few steps.

use std::fmt;

use crate::error::ValueError;

/// Brightness in the entity-facing domain (0-255).
///
/// # Examples
///
/// ```
/// use wordclock_lib::types::{Brightness, Intensity};
///
/// let half = Brightness::new(128);
/// assert_eq!(Intensity::from(half).value(), 25);
/// assert_eq!(Brightness::from(Intensity::new(25).unwrap()).value(), 128);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness.
    pub const MIN: Self = Self(0);

    /// Maximum brightness.
    pub const MAX: Self = Self(255);

    /// Creates a brightness value. Every `u8` is valid.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Creates a brightness value from an arbitrary integer, clamping to [0, 255].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 255) as u8)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Intensity> for Brightness {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from(intensity: Intensity) -> Self {
        let scaled = f32::from(intensity.0) / f32::from(Intensity::MAX.0) * 255.0;
        // Safe: intensity <= 50, so scaled is within [0, 255]
        Self(scaled.round() as u8)
    }
}

/// The clock's native brightness scale, `INTENSITY` (0-50).
///
/// # Examples
///
/// ```
/// use wordclock_lib::types::Intensity;
///
/// assert_eq!(Intensity::new(50).unwrap().value(), 50);
/// assert!(Intensity::new(51).is_err());
/// assert_eq!(Intensity::clamped(80), Intensity::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intensity(u8);

impl Intensity {
    /// Minimum intensity.
    pub const MIN: Self = Self(0);

    /// Maximum intensity.
    pub const MAX: Self = Self(50);

    /// Creates an intensity value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 50.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX.0 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(Self::MAX.0),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates an intensity value, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl From<Brightness> for Intensity {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from(brightness: Brightness) -> Self {
        let scaled = f32::from(brightness.0) / 255.0 * f32::from(Self::MAX.0);
        // Safe: brightness <= 255, so scaled is within [0, 50]
        Self(scaled.round() as u8)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
