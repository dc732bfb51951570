// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event types.

use std::time::Duration;

use crate::entity::{EntityId, EntityState};
use crate::error::Error;

use super::SessionId;

/// Events emitted by the registry and its entities.
///
/// Failures are carried as rendered messages so events stay cheap to clone
/// for every subscriber.
///
/// # Examples
///
/// ```
/// use wordclock_lib::entity::{EntityId, EntityState};
/// use wordclock_lib::event::WordClockEvent;
///
/// let event = WordClockEvent::state_changed(
///     EntityId::from("wordclock_10_0_0_5_time"),
///     EntityState::default(),
/// );
/// assert!(event.is_state_change());
/// assert_eq!(event.entity_id().unwrap().as_str(), "wordclock_10_0_0_5_time");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum WordClockEvent {
    /// A clock was added to the registry.
    SessionAdded {
        /// The new session.
        session_id: SessionId,
    },

    /// A clock was removed from the registry.
    SessionRemoved {
        /// The removed session.
        session_id: SessionId,
    },

    /// The word entities of a session were replaced after a language change.
    EntitiesReplaced {
        /// The session whose words changed.
        session_id: SessionId,
        /// Entities that no longer exist.
        removed: Vec<EntityId>,
        /// Entities that were created.
        added: Vec<EntityId>,
    },

    /// The polling interval of a session changed.
    PollingRescheduled {
        /// The affected session.
        session_id: SessionId,
        /// The new interval.
        interval: Duration,
    },

    /// The last known state of an entity changed.
    StateChanged {
        /// The entity.
        entity_id: EntityId,
        /// The complete new state.
        state: EntityState,
    },

    /// A command was not acknowledged by the clock.
    CommandFailed {
        /// The entity the command targeted.
        entity_id: EntityId,
        /// What went wrong.
        error: String,
    },

    /// A status poll failed; the previous state was kept.
    RefreshFailed {
        /// The entity being refreshed.
        entity_id: EntityId,
        /// What went wrong.
        error: String,
    },
}

impl WordClockEvent {
    /// Returns the session this event is about, if it is a session event.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            Self::SessionAdded { session_id }
            | Self::SessionRemoved { session_id }
            | Self::EntitiesReplaced { session_id, .. }
            | Self::PollingRescheduled { session_id, .. } => Some(*session_id),
            _ => None,
        }
    }

    /// Returns the entity this event is about, if it is an entity event.
    #[must_use]
    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            Self::StateChanged { entity_id, .. }
            | Self::CommandFailed { entity_id, .. }
            | Self::RefreshFailed { entity_id, .. } => Some(entity_id),
            _ => None,
        }
    }

    /// Returns `true` for session lifecycle events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::SessionAdded { .. } | Self::SessionRemoved { .. })
    }

    /// Returns `true` for state change events.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` for failure diagnostics.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. } | Self::RefreshFailed { .. })
    }

    /// Creates a session added event.
    #[must_use]
    pub fn session_added(session_id: SessionId) -> Self {
        Self::SessionAdded { session_id }
    }

    /// Creates a session removed event.
    #[must_use]
    pub fn session_removed(session_id: SessionId) -> Self {
        Self::SessionRemoved { session_id }
    }

    /// Creates an entities replaced event.
    #[must_use]
    pub fn entities_replaced(session_id: SessionId, removed: Vec<EntityId>, added: Vec<EntityId>) -> Self {
        Self::EntitiesReplaced {
            session_id,
            removed,
            added,
        }
    }

    /// Creates a polling rescheduled event.
    #[must_use]
    pub fn polling_rescheduled(session_id: SessionId, interval: Duration) -> Self {
        Self::PollingRescheduled {
            session_id,
            interval,
        }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(entity_id: EntityId, state: EntityState) -> Self {
        Self::StateChanged { entity_id, state }
    }

    /// Creates a command failed event.
    #[must_use]
    pub fn command_failed(entity_id: EntityId, error: &Error) -> Self {
        Self::CommandFailed {
            entity_id,
            error: error.to_string(),
        }
    }

    /// Creates a refresh failed event.
    #[must_use]
    pub fn refresh_failed(entity_id: EntityId, error: &Error) -> Self {
        Self::RefreshFailed {
            entity_id,
            error: error.to_string(),
        }
    }
}
