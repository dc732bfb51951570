// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State and plumbing shared by all entity types.

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::event::{EventBus, WordClockEvent};
use crate::protocol::{DeviceResponse, HttpClient, Request};

use super::{EntityId, EntityState};

/// Identity, transport handle and last known state of one entity.
///
/// The state lock is never held across an await point.
pub(crate) struct EntityCore {
    id: EntityId,
    name: String,
    client: HttpClient,
    events: EventBus,
    state: RwLock<EntityState>,
}

impl EntityCore {
    pub fn new(
        id: EntityId,
        name: String,
        client: HttpClient,
        events: EventBus,
        initial: EntityState,
    ) -> Self {
        Self {
            id,
            name,
            client,
            events,
            state: RwLock::new(initial),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn state(&self) -> EntityState {
        *self.state.read()
    }

    /// Sends a command; on failure logs and publishes a diagnostic.
    pub async fn command(&self, request: &Request) -> Result<DeviceResponse> {
        match self.client.send(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                let error = Error::from(e);
                self.command_failed(&error);
                Err(error)
            }
        }
    }

    /// Updates the state and publishes `StateChanged` if anything changed.
    ///
    /// Returns `true` if the state changed.
    pub fn update(&self, f: impl FnOnce(&mut EntityState)) -> bool {
        let (changed, new_state) = {
            let mut state = self.state.write();
            let before = *state;
            f(&mut state);
            (*state != before, *state)
        };

        if changed {
            tracing::debug!(entity_id = %self.id, state = ?new_state, "Entity state changed");
            self.events
                .publish(WordClockEvent::state_changed(self.id.clone(), new_state));
        }
        changed
    }

    pub fn command_failed(&self, error: &Error) {
        tracing::error!(entity_id = %self.id, error = %error, "Command failed");
        self.events
            .publish(WordClockEvent::command_failed(self.id.clone(), error));
    }

    pub fn refresh_failed(&self, error: &Error) {
        tracing::warn!(entity_id = %self.id, error = %error, "Refresh failed, keeping last known state");
        self.events
            .publish(WordClockEvent::refresh_failed(self.id.clone(), error));
    }
}

impl std::fmt::Debug for EntityCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCore")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
