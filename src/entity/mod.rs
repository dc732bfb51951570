// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controllable entities of a clock.
//!
//! A clock is modelled as a handful of entities:
//!
//! - [`MainLight`] for the time words ([`Channel::Time`])
//! - [`MainLight`] for the background LEDs ([`Channel::Back`])
//! - one [`WordEntity`] per extra word of the configured language, either a
//!   plain switch or a colorable light ([`WordKind`])
//!
//! Every entity implements [`Controllable`]. Local state only changes after
//! the clock acknowledged a command with HTTP 200, or after a status poll
//! decoded cleanly. Failures leave the previous state in place and are
//! reported on the [`EventBus`](crate::event::EventBus).
//!
//! # Examples
//!
//! ```no_run
//! use wordclock_lib::entity::{Controllable, MainLight};
//! use wordclock_lib::event::EventBus;
//! use wordclock_lib::protocol::{HttpClient, codec::Channel};
//! use wordclock_lib::types::{DeviceAddress, RgbColor};
//!
//! # async fn example() -> wordclock_lib::Result<()> {
//! let client = HttpClient::new(DeviceAddress::parse("10.0.0.5")?)?;
//! let time = MainLight::new(Channel::Time, client, EventBus::new());
//!
//! time.turn_on(Some(RgbColor::new(0, 255, 0)), None).await?;
//! assert!(time.state().is_on);
//! # Ok(())
//! # }
//! ```

mod shared;
mod light;
mod word;

pub use light::MainLight;
pub use word::{WordEntity, WordKind};

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::protocol::codec::Channel;
use crate::types::{Brightness, DeviceAddress, RgbColor};

/// Stable identity of an entity.
///
/// Derived from the clock's address and the entity's role, so it survives
/// reconfiguration as long as the address and word id stay the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Identity of the time or background light of a clock.
    #[must_use]
    pub fn for_light(address: &DeviceAddress, channel: Channel) -> Self {
        let role = match channel {
            Channel::Time => "time",
            Channel::Back => "background",
        };
        Self(format!("{}_{role}", address.device_key()))
    }

    /// Identity of an extra word of a clock.
    #[must_use]
    pub fn for_word(address: &DeviceAddress, word_id: u32) -> Self {
        Self(format!("{}_word_{word_id}", address.device_key()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Last known state of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityState {
    /// Whether the entity is lit.
    pub is_on: bool,
    /// Last known color; `None` for switches and for word lights that were
    /// never given one.
    pub color: Option<RgbColor>,
    /// Last known brightness; only the main lights carry one.
    pub brightness: Option<Brightness>,
}

/// What an entity controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The time words.
    TimeLight,
    /// The background LEDs.
    BackgroundLight,
    /// An extra word with color support.
    WordLight,
    /// An extra word that can only be switched.
    WordSwitch,
}

impl EntityKind {
    /// Returns `true` if the entity depends on the configured language.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(self, Self::WordLight | Self::WordSwitch)
    }

    /// Returns `true` if the entity accepts a color.
    #[must_use]
    pub const fn supports_color(&self) -> bool {
        !matches!(self, Self::WordSwitch)
    }
}

/// Device description shared by all entities of a clock.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceInfo {
    /// Unique device identifier (`wordclock_10_0_0_5`).
    pub identifier: String,
    /// Human-readable name.
    pub name: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Model.
    pub model: String,
    /// Web interface of the clock.
    pub configuration_url: String,
}

impl DeviceInfo {
    /// Describes the clock at `address`.
    #[must_use]
    pub fn for_address(address: &DeviceAddress) -> Self {
        Self {
            identifier: address.device_key(),
            name: format!("WordClock ({})", address.ip()),
            manufacturer: "AWSW".to_string(),
            model: "WordClock".to_string(),
            configuration_url: format!("http://{}", address.ip()),
        }
    }
}

/// Capability contract implemented by every entity.
#[allow(async_fn_in_trait)]
pub trait Controllable {
    /// Returns the stable identity.
    fn id(&self) -> &EntityId;

    /// Returns the display name.
    fn name(&self) -> &str;

    /// Returns what the entity controls.
    fn kind(&self) -> EntityKind;

    /// Returns a snapshot of the last known state.
    fn state(&self) -> EntityState;

    /// Turns the entity on, optionally with a color and brightness.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the clock did not acknowledge the
    /// command; local state is left untouched in that case.
    async fn turn_on(&self, color: Option<RgbColor>, brightness: Option<Brightness>) -> Result<()>;

    /// Turns the entity off.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the clock did not acknowledge the
    /// command; local state is left untouched in that case.
    async fn turn_off(&self) -> Result<()>;

    /// Reads the current state from the clock and adopts it.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error; local state is left untouched
    /// in that case.
    async fn refresh(&self) -> Result<()>;
}

/// Any entity of a clock.
///
/// Cloning only clones the handle; all clones refer to the same entity.
#[derive(Debug, Clone)]
pub enum Entity {
    /// Time or background light.
    Light(Arc<MainLight>),
    /// Extra word.
    Word(Arc<WordEntity>),
}

impl Entity {
    /// Returns `true` if both handles refer to the same entity instance.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Light(a), Self::Light(b)) => Arc::ptr_eq(a, b),
            (Self::Word(a), Self::Word(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<MainLight> for Entity {
    fn from(light: MainLight) -> Self {
        Self::Light(Arc::new(light))
    }
}

impl From<WordEntity> for Entity {
    fn from(word: WordEntity) -> Self {
        Self::Word(Arc::new(word))
    }
}

impl Controllable for Entity {
    fn id(&self) -> &EntityId {
        match self {
            Self::Light(light) => light.id(),
            Self::Word(word) => word.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Light(light) => light.name(),
            Self::Word(word) => word.name(),
        }
    }

    fn kind(&self) -> EntityKind {
        match self {
            Self::Light(light) => light.kind(),
            Self::Word(word) => word.kind(),
        }
    }

    fn state(&self) -> EntityState {
        match self {
            Self::Light(light) => light.state(),
            Self::Word(word) => word.state(),
        }
    }

    async fn turn_on(&self, color: Option<RgbColor>, brightness: Option<Brightness>) -> Result<()> {
        match self {
            Self::Light(light) => light.turn_on(color, brightness).await,
            Self::Word(word) => word.turn_on(color, brightness).await,
        }
    }

    async fn turn_off(&self) -> Result<()> {
        match self {
            Self::Light(light) => light.turn_off().await,
            Self::Word(word) => word.turn_off().await,
        }
    }

    async fn refresh(&self) -> Result<()> {
        match self {
            Self::Light(light) => light.refresh().await,
            Self::Word(word) => word.refresh().await,
        }
    }
}
