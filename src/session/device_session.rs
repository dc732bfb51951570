// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One configured clock and everything it owns.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::catalog::WordCatalog;
use crate::entity::{Controllable, DeviceInfo, Entity, EntityId, MainLight, WordEntity};
use crate::error::Result;
use crate::event::{EventBus, SessionId};
use crate::polling::{PollingCoordinator, TickReport};
use crate::protocol::HttpClient;
use crate::protocol::codec::Channel;

use super::DeviceSessionConfig;

/// A running session: transport, entities and polling task of one clock.
///
/// The time and background lights live as long as the session. The extra
/// words are rebuilt whenever the language changes.
pub struct DeviceSession {
    id: SessionId,
    config: RwLock<DeviceSessionConfig>,
    client: HttpClient,
    time: Arc<MainLight>,
    background: Arc<MainLight>,
    events: EventBus,
    coordinator: PollingCoordinator,
    closed: AtomicBool,
}

impl DeviceSession {
    /// Builds the entities of `config` and starts polling.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the polling
    /// interval is zero.
    pub(crate) async fn start(
        id: SessionId,
        config: DeviceSessionConfig,
        catalog: &WordCatalog,
        events: EventBus,
    ) -> Result<Self> {
        config.validate()?;
        let language = config.language.clone();
        let interval = config.polling_interval();

        let client = config.http_config().into_client()?;
        let time = Arc::new(MainLight::new(Channel::Time, client.clone(), events.clone()));
        let background = Arc::new(MainLight::new(Channel::Back, client.clone(), events.clone()));

        let session = Self {
            id,
            client,
            time,
            background,
            events,
            coordinator: PollingCoordinator::new(Vec::new()),
            closed: AtomicBool::new(false),
            config: RwLock::new(config),
        };

        let words = session.build_words(catalog, &language);
        session.coordinator.replace_entity_set(session.compose(words));
        session.coordinator.reschedule(interval).await?;

        tracing::info!(
            session_id = %session.id,
            address = %session.client.address(),
            entities = session.coordinator.entity_set().len(),
            "Session started"
        );

        Ok(session)
    }

    /// Returns the session id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> DeviceSessionConfig {
        self.config.read().clone()
    }

    /// Returns the device description shared by all entities.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::for_address(&self.client.address())
    }

    /// Returns the time light.
    #[must_use]
    pub fn time_light(&self) -> &Arc<MainLight> {
        &self.time
    }

    /// Returns the background light.
    #[must_use]
    pub fn background_light(&self) -> &Arc<MainLight> {
        &self.background
    }

    /// Returns the live entity set: time, background, then the words.
    #[must_use]
    pub fn entities(&self) -> Arc<Vec<Entity>> {
        self.coordinator.entity_set()
    }

    /// Returns the polling coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &PollingCoordinator {
        &self.coordinator
    }

    /// Returns `true` once the session has been shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Creates the word entities of `language`.
    pub(crate) fn build_words(&self, catalog: &WordCatalog, language: &str) -> Vec<Entity> {
        let kind = self.config.read().word_kind;
        catalog
            .lookup(language)
            .iter()
            .map(|entry| {
                Entity::from(WordEntity::new(
                    entry.clone(),
                    kind,
                    self.client.clone(),
                    self.events.clone(),
                ))
            })
            .collect()
    }

    fn compose(&self, words: Vec<Entity>) -> Vec<Entity> {
        let mut entities = Vec::with_capacity(words.len() + 2);
        entities.push(Entity::Light(Arc::clone(&self.time)));
        entities.push(Entity::Light(Arc::clone(&self.background)));
        entities.extend(words);
        entities
    }

    /// Switches to `language`, replacing only the word entities.
    ///
    /// Returns the ids of the words that disappeared and of those that were
    /// created. Words with the same id in both languages are rebuilt too and
    /// therefore show up in both lists.
    pub(crate) fn replace_words(
        &self,
        catalog: &WordCatalog,
        language: &str,
    ) -> (Vec<EntityId>, Vec<EntityId>) {
        let words = self.build_words(catalog, language);
        let added: Vec<EntityId> = words.iter().map(|w| w.id().clone()).collect();

        let previous = self.coordinator.entity_set();
        let removed: Vec<EntityId> = previous
            .iter()
            .filter(|e| e.kind().is_word())
            .map(|e| e.id().clone())
            .collect();

        self.coordinator.replace_entity_set(self.compose(words));
        self.config.write().language = language.to_string();

        tracing::info!(
            session_id = %self.id,
            language = %language,
            removed = removed.len(),
            added = added.len(),
            "Word entities replaced"
        );

        (removed, added)
    }

    /// Changes the polling interval and restarts polling.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ZeroPollingInterval` for an interval shorter than
    /// one second; the configuration is left unchanged in that case.
    pub(crate) async fn set_polling_interval(&self, interval: Duration) -> Result<()> {
        let updated = self.config().with_polling_interval(interval);
        updated.validate()?;

        self.coordinator.reschedule(updated.polling_interval()).await?;
        *self.config.write() = updated;
        Ok(())
    }

    /// Polls every entity once, right now.
    pub async fn poll_now(&self) -> TickReport {
        self.coordinator.tick().await
    }

    /// Stops polling. Returns `true` only for the call that actually closed
    /// the session.
    pub(crate) async fn shutdown(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.coordinator.stop().await;
        tracing::info!(session_id = %self.id, "Session stopped");
        true
    }

    /// Ids of all entities, for indexing.
    pub(crate) fn entity_ids(&self) -> HashSet<EntityId> {
        self.entities().iter().map(|e| e.id().clone()).collect()
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("id", &self.id)
            .field("address", &self.client.address())
            .field("language", &self.config.read().language)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
