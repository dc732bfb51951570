// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for WordClock control.
//!
//! # Types
//!
//! - [`RgbColor`] - 8-bit RGB color, `(0, 0, 0)` meaning "off"
//! - [`Brightness`] - Entity-facing brightness (0-255)
//! - [`Intensity`] - The clock's native brightness (0-50)
//! - [`DeviceAddress`] - IP literal and control port of a clock

mod address;
mod brightness;
mod rgb_color;

pub use address::DeviceAddress;
pub use brightness::{Brightness, Intensity};
pub use rgb_color::RgbColor;
