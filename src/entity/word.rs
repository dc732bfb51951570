// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extra word entities.

use crate::catalog::WordCatalogEntry;
use crate::error::{Error, Result};
use crate::event::EventBus;
use crate::protocol::codec;
use crate::protocol::{HttpClient, Request};
use crate::types::{Brightness, RgbColor};

use super::shared::EntityCore;
use super::{Controllable, EntityId, EntityKind, EntityState};

/// How extra words are exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordKind {
    /// On/off only.
    #[default]
    Switch,
    /// On/off with an optional color.
    Light,
}

/// A single extra word on the clock face.
#[derive(Debug)]
pub struct WordEntity {
    entry: WordCatalogEntry,
    kind: WordKind,
    core: EntityCore,
}

impl WordEntity {
    /// Creates the entity for `entry` on the clock behind `client`.
    ///
    /// The word starts off until the first refresh.
    #[must_use]
    pub fn new(entry: WordCatalogEntry, kind: WordKind, client: HttpClient, events: EventBus) -> Self {
        let address = client.address();
        let id = EntityId::for_word(&address, entry.word_id());
        let name = format!("Word {}", entry.display_name());

        Self {
            entry,
            kind,
            core: EntityCore::new(id, name, client, events, EntityState::default()),
        }
    }

    /// Returns the catalog entry this entity was built from.
    #[must_use]
    pub fn entry(&self) -> &WordCatalogEntry {
        &self.entry
    }

    /// Returns the word identifier.
    #[must_use]
    pub fn word_id(&self) -> u32 {
        self.entry.word_id()
    }

    /// Returns whether the word is a switch or a light.
    #[must_use]
    pub fn word_kind(&self) -> WordKind {
        self.kind
    }
}

impl Controllable for WordEntity {
    fn id(&self) -> &EntityId {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn kind(&self) -> EntityKind {
        match self.kind {
            WordKind::Switch => EntityKind::WordSwitch,
            WordKind::Light => EntityKind::WordLight,
        }
    }

    fn state(&self) -> EntityState {
        self.core.state()
    }

    /// Switches the word on.
    ///
    /// Word lights send the color along when one is given. The `/ew/`
    /// endpoint has no intensity parameter, so a brightness is ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapabilityNotSupported` when a switch is given a color
    /// or brightness; nothing is sent in that case.
    async fn turn_on(&self, color: Option<RgbColor>, brightness: Option<Brightness>) -> Result<()> {
        if self.kind == WordKind::Switch && (color.is_some() || brightness.is_some()) {
            return Err(Error::CapabilityNotSupported);
        }
        if brightness.is_some() {
            tracing::debug!(entity_id = %self.id(), "Ignoring brightness for extra word");
        }

        tracing::debug!(
            entity_id = %self.id(),
            word_id = self.word_id(),
            color = ?color,
            "Turning on word"
        );

        self.core
            .command(&Request::SetWord {
                word_id: self.word_id(),
                on: true,
                color,
            })
            .await?;

        self.core.update(|state| {
            state.is_on = true;
            if color.is_some() {
                state.color = color;
            }
        });
        Ok(())
    }

    async fn turn_off(&self) -> Result<()> {
        tracing::debug!(entity_id = %self.id(), word_id = self.word_id(), "Turning off word");

        self.core
            .command(&Request::SetWord {
                word_id: self.word_id(),
                on: false,
                color: None,
            })
            .await?;

        self.core.update(|state| state.is_on = false);
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        let result = async {
            let response = self
                .core
                .client()
                .send(&Request::WordStatus {
                    word_id: self.word_id(),
                })
                .await?;
            Ok::<_, Error>(codec::decode_word_state(response.body())?)
        }
        .await;

        match result {
            Ok(is_on) => {
                self.core.update(|state| state.is_on = is_on);
                Ok(())
            }
            Err(error) => {
                self.core.refresh_failed(&error);
                Err(error)
            }
        }
    }
}
