// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `set_word_color` service.
//!
//! The only action exposed to automations besides plain on/off. It targets a
//! single entity by id and turns it on with the given color and optional
//! brightness. Dispatch lives on
//! [`DeviceSessionRegistry::set_word_color`](crate::session::DeviceSessionRegistry::set_word_color).

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::ParseError;
use crate::types::{Brightness, RgbColor};

/// Name under which the host registers the service.
pub const SERVICE_NAME: &str = "set_word_color";

/// Payload of the `set_word_color` service.
///
/// Components outside `0..=255` are clamped rather than rejected.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use wordclock_lib::service::SetWordColor;
/// use wordclock_lib::types::RgbColor;
///
/// let request = SetWordColor::from_value(&json!({
///     "entity_id": "wordclock_10_0_0_5_word_3",
///     "rgb_color": [10, 20, 300],
/// }))
/// .unwrap();
///
/// assert_eq!(request.color(), RgbColor::new(10, 20, 255));
/// assert_eq!(request.brightness(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetWordColor {
    /// Target entity.
    pub entity_id: EntityId,
    /// Requested color as `[r, g, b]`.
    pub rgb_color: [i64; 3],
    /// Requested brightness in `0..=255`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
}

impl SetWordColor {
    /// Creates a request for `entity_id` with `color`.
    #[must_use]
    pub fn new(entity_id: impl Into<EntityId>, color: RgbColor) -> Self {
        Self {
            entity_id: entity_id.into(),
            rgb_color: [
                i64::from(color.red()),
                i64::from(color.green()),
                i64::from(color.blue()),
            ],
            brightness: None,
        }
    }

    /// Adds a brightness.
    #[must_use]
    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = Some(i64::from(brightness.value()));
        self
    }

    /// Parses a raw service payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if a field is missing or has the
    /// wrong shape.
    pub fn from_value(payload: &serde_json::Value) -> Result<Self, ParseError> {
        Self::deserialize(payload).map_err(|e| ParseError::InvalidValue {
            field: SERVICE_NAME.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the clamped color.
    #[must_use]
    pub fn color(&self) -> RgbColor {
        let [red, green, blue] = self.rgb_color;
        RgbColor::clamped(red, green, blue)
    }

    /// Returns the clamped brightness, if one was requested.
    #[must_use]
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness.map(Brightness::clamped)
    }
}
