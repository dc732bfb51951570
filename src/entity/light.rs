// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time and background lights.

use crate::error::Result;
use crate::event::EventBus;
use crate::protocol::codec::{self, Channel};
use crate::protocol::{HttpClient, Request};
use crate::types::{Brightness, RgbColor};

use super::shared::EntityCore;
use super::{Controllable, EntityId, EntityKind, EntityState};

/// One of the two main color channels of a clock.
///
/// The clock has no on/off flag for these channels; "off" is the color
/// `(0, 0, 0)`. Turning a light off therefore sends black but keeps the last
/// color locally, so a later [`turn_on`](Controllable::turn_on) without a
/// color restores it. When there is nothing to restore the channel's default
/// color is used: red for the time, light blue for the background.
#[derive(Debug)]
pub struct MainLight {
    channel: Channel,
    core: EntityCore,
}

impl MainLight {
    /// Creates the light for `channel` of the clock behind `client`.
    ///
    /// The light starts off with full brightness until the first refresh.
    #[must_use]
    pub fn new(channel: Channel, client: HttpClient, events: EventBus) -> Self {
        let address = client.address();
        let name = match channel {
            Channel::Time => "WordClock Time",
            Channel::Back => "WordClock Background",
        };
        let initial = EntityState {
            is_on: false,
            color: Some(RgbColor::OFF),
            brightness: Some(Brightness::MAX),
        };

        Self {
            channel,
            core: EntityCore::new(
                EntityId::for_light(&address, channel),
                name.to_string(),
                client,
                events,
                initial,
            ),
        }
    }

    /// Returns the channel this light drives.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the last known color.
    #[must_use]
    pub fn color(&self) -> RgbColor {
        self.core.state().color.unwrap_or(RgbColor::OFF)
    }

    /// Returns the last known brightness.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.core.state().brightness.unwrap_or_default()
    }

    /// Reads this channel's color and the shared intensity from `/status`.
    async fn fetch_status(&self) -> Result<(RgbColor, Brightness)> {
        let response = self.core.client().send(&Request::Status).await?;
        let blob = codec::decode_status_blob(response.body());
        Ok((blob.color(self.channel)?, blob.brightness()?))
    }

    /// Picks the color to send when turning on.
    fn resolve_color(&self, requested: Option<RgbColor>) -> RgbColor {
        requested.unwrap_or_else(|| {
            let current = self.color();
            if current.is_off() {
                self.channel.default_color()
            } else {
                current
            }
        })
    }
}

impl Controllable for MainLight {
    fn id(&self) -> &EntityId {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn kind(&self) -> EntityKind {
        match self.channel {
            Channel::Time => EntityKind::TimeLight,
            Channel::Back => EntityKind::BackgroundLight,
        }
    }

    fn state(&self) -> EntityState {
        self.core.state()
    }

    async fn turn_on(&self, color: Option<RgbColor>, brightness: Option<Brightness>) -> Result<()> {
        let color = self.resolve_color(color);

        tracing::debug!(
            entity_id = %self.id(),
            color = %color,
            brightness = ?brightness,
            "Turning on light"
        );

        self.core
            .command(&Request::SetColor {
                channel: self.channel,
                color,
                brightness,
            })
            .await?;

        self.core.update(|state| {
            state.is_on = codec::derive_on_state_from_color(color);
            state.color = Some(color);
            if let Some(brightness) = brightness {
                state.brightness = Some(brightness);
            }
        });
        Ok(())
    }

    async fn turn_off(&self) -> Result<()> {
        tracing::debug!(entity_id = %self.id(), "Turning off light");

        self.core
            .command(&Request::SetColor {
                channel: self.channel,
                color: RgbColor::OFF,
                brightness: None,
            })
            .await?;

        self.core.update(|state| state.is_on = false);
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        match self.fetch_status().await {
            Ok((color, brightness)) => {
                self.core.update(|state| {
                    state.is_on = codec::derive_on_state_from_color(color);
                    state.color = Some(color);
                    state.brightness = Some(brightness);
                });
                Ok(())
            }
            Err(error) => {
                self.core.refresh_failed(&error);
                Err(error)
            }
        }
    }
}
