// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting clock events.

use tokio::sync::broadcast;

use super::WordClockEvent;

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out of [`WordClockEvent`]s to any number of subscribers.
///
/// Every entity of a registry holds a clone of the same bus. Publishing never
/// blocks and never fails.
///
/// Slow subscribers that fall more than [`DEFAULT_CHANNEL_CAPACITY`] events
/// behind see `RecvError::Lagged` and miss the oldest events.
///
/// # Examples
///
/// ```
/// use wordclock_lib::event::{EventBus, SessionId, WordClockEvent};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(WordClockEvent::session_added(SessionId::new()));
/// assert!(rx.try_recv().unwrap().is_lifecycle());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WordClockEvent>,
}

impl EventBus {
    /// Creates a bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus buffering at most `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WordClockEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event; discarded if nobody listens.
    pub fn publish(&self, event: WordClockEvent) {
        tracing::trace!(event = ?event, "Publishing event");
        let _ = self.sender.send(event);
    }

    /// Publishes an event and returns how many receivers got it.
    #[must_use]
    pub fn publish_counted(&self, event: WordClockEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SessionId;

    #[test]
    fn new_bus_has_no_subscribers() {
        assert_eq!(EventBus::new().subscriber_count(), 0);
    }

    #[test]
    fn subscribe_and_drop_track_count() {
        let bus = EventBus::new();
        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn publish_delivers_to_every_subscriber() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let session_id = SessionId::new();
        bus.publish(WordClockEvent::session_added(session_id));

        assert_eq!(rx1.recv().await.unwrap().session_id(), Some(session_id));
        assert_eq!(rx2.recv().await.unwrap().session_id(), Some(session_id));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        let count = bus.publish_counted(WordClockEvent::session_added(SessionId::new()));
        assert_eq!(count, 0);
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
