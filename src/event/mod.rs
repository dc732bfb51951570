// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notifications about sessions and entities.
//!
//! Everything the host needs to know without polling the registry is
//! published on an [`EventBus`]: sessions coming and going, entity sets being
//! swapped after a language change, state changes, and the diagnostics for
//! failed commands and refreshes.
//!
//! # Examples
//!
//! ```
//! use wordclock_lib::event::{EventBus, SessionId, WordClockEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let session_id = SessionId::new();
//! bus.publish(WordClockEvent::session_added(session_id));
//!
//! let event = rx.try_recv().unwrap();
//! assert_eq!(event.session_id(), Some(session_id));
//! ```

mod event_bus;
mod session_id;
mod wordclock_event;

pub use event_bus::{DEFAULT_CHANNEL_CAPACITY, EventBus};
pub use session_id::SessionId;
pub use wordclock_event::WordClockEvent;
