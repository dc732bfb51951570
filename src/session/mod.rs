// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configured clocks and their lifecycle.
//!
//! A [`DeviceSession`] is everything one clock needs at runtime: a shared HTTP
//! client, the time and background lights, the extra words of the configured
//! language and a polling task. The [`DeviceSessionRegistry`] owns all
//! sessions of the process and indexes their entities by id.
//!
//! # Reconfiguration
//!
//! - Changing the language rebuilds only the word entities. The time and
//!   background lights keep their identity and last known state.
//! - Changing the polling interval cancels the running task before the new
//!   one is spawned, then polls once immediately.
//!
//! # Teardown
//!
//! [`DeviceSessionRegistry::remove_session`] is idempotent: under concurrent
//! calls exactly one caller performs the teardown.

mod config;
mod device_session;
mod registry;

pub use config::{DEFAULT_POLLING_SECS, DeviceSessionConfig, SessionOptions};
pub use device_session::DeviceSession;
pub use registry::DeviceSessionRegistry;
