// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of all configured clocks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use crate::catalog::WordCatalog;
use crate::entity::{Controllable, DeviceInfo, Entity, EntityId, EntityState};
use crate::error::{DeviceError, Error, Result};
use crate::event::{EventBus, SessionId, WordClockEvent};
use crate::polling::TickReport;
use crate::service::SetWordColor;
use crate::types::{Brightness, RgbColor};

use super::{DeviceSession, DeviceSessionConfig, SessionOptions};

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<SessionId, Arc<DeviceSession>>,
    entities: HashMap<EntityId, Entity>,
}

impl Sessions {
    fn index(&mut self, entities: &[Entity]) {
        for entity in entities {
            self.entities.insert(entity.id().clone(), entity.clone());
        }
    }

    fn unindex<'a>(&mut self, ids: impl IntoIterator<Item = &'a EntityId>) {
        for id in ids {
            self.entities.remove(id);
        }
    }
}

/// Owns every configured clock of the process.
///
/// Sessions and the entity index are guarded by one lock, so an entity is
/// reachable through the index exactly as long as it belongs to a live
/// session. Entity commands run outside the lock.
///
/// # Examples
///
/// ```no_run
/// use wordclock_lib::session::{DeviceSessionConfig, DeviceSessionRegistry};
/// use wordclock_lib::types::{DeviceAddress, RgbColor};
///
/// # async fn example() -> wordclock_lib::Result<()> {
/// let registry = DeviceSessionRegistry::new();
///
/// let mut events = registry.subscribe();
/// tokio::spawn(async move {
///     while let Ok(event) = events.recv().await {
///         println!("{event:?}");
///     }
/// });
///
/// let config = DeviceSessionConfig::new(DeviceAddress::parse("10.0.0.5")?);
/// let session_id = registry.add_session(config).await?;
///
/// registry
///     .turn_on(&"wordclock_10_0_0_5_time".into(), Some(RgbColor::new(0, 255, 0)), None)
///     .await?;
///
/// registry.remove_session(session_id).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceSessionRegistry {
    sessions: RwLock<Sessions>,
    catalog: Arc<WordCatalog>,
    event_bus: EventBus,
}

impl DeviceSessionRegistry {
    /// Creates a registry using the built-in word catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(WordCatalog::builtin())
    }

    /// Creates a registry using a custom word catalog.
    #[must_use]
    pub fn with_catalog(catalog: WordCatalog) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            catalog: Arc::new(catalog),
            event_bus: EventBus::new(),
        }
    }

    /// Returns the word catalog.
    #[must_use]
    pub fn catalog(&self) -> &WordCatalog {
        &self.catalog
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to session and entity events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WordClockEvent> {
        self.event_bus.subscribe()
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Adds a clock and starts polling it.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ZeroPollingInterval` for a zero interval and
    /// `DeviceError::DuplicateAddress` if a session for the same address
    /// already exists. Nothing is created in either case.
    pub async fn add_session(&self, config: DeviceSessionConfig) -> Result<SessionId> {
        config.validate()?;

        let mut sessions = self.sessions.write().await;
        if sessions
            .by_id
            .values()
            .any(|s| s.config().address == config.address)
        {
            tracing::warn!(address = %config.address, "Rejecting duplicate clock");
            return Err(DeviceError::DuplicateAddress(config.address.to_string()).into());
        }

        let session_id = SessionId::new();
        let session =
            DeviceSession::start(session_id, config, &self.catalog, self.event_bus.clone()).await?;

        sessions.index(&session.entities());
        sessions.by_id.insert(session_id, Arc::new(session));
        drop(sessions);

        self.event_bus.publish(WordClockEvent::session_added(session_id));
        Ok(session_id)
    }

    /// Tears a session down: stops polling, unindexes its entities and
    /// releases its connection pool once the last handle is dropped.
    ///
    /// Returns `true` if this call removed the session. Concurrent or repeated
    /// calls for the same id return `false`.
    pub async fn remove_session(&self, session_id: SessionId) -> bool {
        let session = {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.by_id.remove(&session_id) else {
                return false;
            };
            sessions.unindex(&session.entity_ids());
            session
        };

        session.shutdown().await;
        self.event_bus
            .publish(WordClockEvent::session_removed(session_id));
        true
    }

    /// Applies runtime options to a session.
    ///
    /// A language change replaces only the word entities. An interval change
    /// restarts polling and then polls once immediately.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` for an unknown session and
    /// `ValueError::ZeroPollingInterval` for an interval shorter than one
    /// second. A rejected interval leaves the language untouched too.
    pub async fn update_options(&self, session_id: SessionId, options: SessionOptions) -> Result<()> {
        let session = self.session(session_id).await.ok_or(Error::SessionNotFound)?;
        let current = session.config();

        let new_interval = options
            .polling_interval
            .filter(|&interval| interval != current.polling_interval());
        if let Some(interval) = new_interval {
            current.clone().with_polling_interval(interval).validate()?;
        }

        if let Some(language) = options.language.filter(|l| *l != current.language) {
            let mut sessions = self.sessions.write().await;
            if session.is_closed() {
                return Err(Error::SessionNotFound);
            }
            let (removed, added) = session.replace_words(&self.catalog, &language);
            sessions.unindex(&removed);
            sessions.index(&session.entities()[2..]);
            drop(sessions);

            self.event_bus.publish(WordClockEvent::entities_replaced(
                session_id, removed, added,
            ));
        }

        if let Some(interval) = new_interval {
            session.set_polling_interval(interval).await?;
            self.event_bus.publish(WordClockEvent::polling_rescheduled(
                session_id,
                session.config().polling_interval(),
            ));
            session.poll_now().await;
        }

        Ok(())
    }

    /// Tears down every session.
    pub async fn shutdown(&self) {
        let ids = self.session_ids().await;
        for session_id in ids {
            self.remove_session(session_id).await;
        }
        tracing::debug!("Registry shut down");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the ids of all sessions.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.by_id.keys().copied().collect()
    }

    /// Returns the number of sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.by_id.len()
    }

    /// Returns a session handle.
    pub async fn session(&self, session_id: SessionId) -> Option<Arc<DeviceSession>> {
        self.sessions.read().await.by_id.get(&session_id).cloned()
    }

    /// Returns the current configuration of a session.
    pub async fn session_config(&self, session_id: SessionId) -> Option<DeviceSessionConfig> {
        self.session(session_id).await.map(|s| s.config())
    }

    /// Returns the device description of a session.
    pub async fn device_info(&self, session_id: SessionId) -> Option<DeviceInfo> {
        self.session(session_id).await.map(|s| s.device_info())
    }

    /// Returns the entity ids of a session: time, background, then words.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` for an unknown session.
    pub async fn entity_ids(&self, session_id: SessionId) -> Result<Vec<EntityId>> {
        let session = self.session(session_id).await.ok_or(Error::SessionNotFound)?;
        Ok(session.entities().iter().map(|e| e.id().clone()).collect())
    }

    /// Resolves an entity through the index.
    pub async fn entity(&self, entity_id: &EntityId) -> Option<Entity> {
        self.sessions.read().await.entities.get(entity_id).cloned()
    }

    /// Returns the last known state of an entity.
    pub async fn entity_state(&self, entity_id: &EntityId) -> Option<EntityState> {
        self.entity(entity_id).await.map(|e| e.state())
    }

    async fn resolve(&self, entity_id: &EntityId) -> Result<Entity> {
        self.entity(entity_id)
            .await
            .ok_or_else(|| Error::EntityNotFound(entity_id.clone()))
    }

    // =========================================================================
    // Entity commands
    // =========================================================================

    /// Turns an entity on.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntityNotFound` for an unknown entity, otherwise see
    /// [`Controllable::turn_on`].
    pub async fn turn_on(
        &self,
        entity_id: &EntityId,
        color: Option<RgbColor>,
        brightness: Option<Brightness>,
    ) -> Result<()> {
        self.resolve(entity_id).await?.turn_on(color, brightness).await
    }

    /// Turns an entity off.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntityNotFound` for an unknown entity, otherwise see
    /// [`Controllable::turn_off`].
    pub async fn turn_off(&self, entity_id: &EntityId) -> Result<()> {
        self.resolve(entity_id).await?.turn_off().await
    }

    /// Refreshes one entity from the clock.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntityNotFound` for an unknown entity, otherwise see
    /// [`Controllable::refresh`].
    pub async fn refresh(&self, entity_id: &EntityId) -> Result<()> {
        self.resolve(entity_id).await?.refresh().await
    }

    /// Polls every entity of a session once, right now.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` for an unknown session.
    pub async fn poll_now(&self, session_id: SessionId) -> Result<TickReport> {
        let session = self.session(session_id).await.ok_or(Error::SessionNotFound)?;
        Ok(session.poll_now().await)
    }

    /// Sets the color of a light or colorable word.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntityNotFound` for an unknown entity and
    /// `Error::CapabilityNotSupported` for a word switch; no command is sent
    /// in either case.
    pub async fn set_word_color(&self, request: SetWordColor) -> Result<()> {
        let entity = self.resolve(&request.entity_id).await?;
        if !entity.kind().supports_color() {
            tracing::warn!(entity_id = %request.entity_id, "Entity does not accept a color");
            return Err(Error::CapabilityNotSupported);
        }

        entity
            .turn_on(Some(request.color()), request.brightness())
            .await
    }

    /// Runs the `set_word_color` service from a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for a malformed payload, otherwise
    /// see [`set_word_color`](Self::set_word_color).
    pub async fn call_service(&self, payload: &serde_json::Value) -> Result<()> {
        let request = SetWordColor::from_value(payload)?;
        self.set_word_color(request).await
    }
}

impl Default for DeviceSessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
