// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `WordClock` Lib - A Rust library to integrate AWSW `WordClock` displays.
//!
//! The clock speaks a tiny plaintext HTTP dialect on port 2023. This library
//! models one clock as a set of entities, keeps their state in sync by
//! polling, and translates on/off/color/brightness intents into requests.
//!
//! # Entities
//!
//! - **Time light**: color of the words telling the time
//! - **Background light**: color of the unlit letters
//! - **Extra words**: per-language auxiliary words such as `ALARM`, exposed
//!   either as switches or as colorable lights
//!
//! # Quick Start
//!
//! ## Registry
//!
//! ```no_run
//! use std::time::Duration;
//! use wordclock_lib::session::{DeviceSessionConfig, DeviceSessionRegistry, SessionOptions};
//! use wordclock_lib::types::{DeviceAddress, RgbColor};
//!
//! #[tokio::main]
//! async fn main() -> wordclock_lib::Result<()> {
//!     let registry = DeviceSessionRegistry::new();
//!
//!     let config = DeviceSessionConfig::new(DeviceAddress::parse("192.168.1.80")?)
//!         .with_polling_interval(Duration::from_secs(10));
//!     let session_id = registry.add_session(config).await?;
//!
//!     for id in registry.entity_ids(session_id).await? {
//!         println!("{id}: {:?}", registry.entity_state(&id).await);
//!     }
//!
//!     registry
//!         .turn_on(&"wordclock_192_168_1_80_time".into(), Some(RgbColor::new(255, 120, 0)), None)
//!         .await?;
//!
//!     registry
//!         .update_options(session_id, SessionOptions::new().with_language("German"))
//!         .await?;
//!
//!     registry.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Service Payload
//!
//! ```no_run
//! use serde_json::json;
//! use wordclock_lib::session::DeviceSessionRegistry;
//!
//! # async fn example(registry: &DeviceSessionRegistry) -> wordclock_lib::Result<()> {
//! registry
//!     .call_service(&json!({
//!         "entity_id": "wordclock_192_168_1_80_word_3",
//!         "rgb_color": [10, 20, 30],
//!     }))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Single Entity
//!
//! ```no_run
//! use wordclock_lib::entity::{Controllable, MainLight};
//! use wordclock_lib::event::EventBus;
//! use wordclock_lib::protocol::{HttpClient, codec::Channel};
//! use wordclock_lib::types::DeviceAddress;
//!
//! # async fn example() -> wordclock_lib::Result<()> {
//! let client = HttpClient::new(DeviceAddress::parse("192.168.1.80")?)?;
//! let background = MainLight::new(Channel::Back, client, EventBus::new());
//!
//! background.refresh().await?;
//! println!("{:?}", background.state());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod entity;
pub mod error;
pub mod event;
pub mod polling;
pub mod protocol;
pub mod service;
pub mod session;
pub mod types;

pub use catalog::{WordCatalog, WordCatalogEntry};
pub use entity::{Controllable, Entity, EntityId, EntityKind, EntityState, MainLight, WordEntity, WordKind};
pub use error::{DeviceError, Error, ParseError, Result, TransportError, ValueError};
pub use event::{EventBus, SessionId, WordClockEvent};
pub use polling::{PollingCoordinator, TickReport};
pub use protocol::{HttpClient, HttpConfig};
pub use service::SetWordColor;
pub use session::{DeviceSession, DeviceSessionConfig, DeviceSessionRegistry, SessionOptions};
pub use types::{Brightness, DeviceAddress, Intensity, RgbColor};
