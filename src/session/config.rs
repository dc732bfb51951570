// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_LANGUAGE;
use crate::entity::WordKind;
use crate::error::ValueError;
use crate::protocol::HttpConfig;
use crate::types::DeviceAddress;

/// Default polling interval in seconds.
pub const DEFAULT_POLLING_SECS: u64 = 5;

/// Persistent configuration of one clock.
///
/// Serializable so the host can keep it in its own key-value store.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wordclock_lib::entity::WordKind;
/// use wordclock_lib::session::DeviceSessionConfig;
/// use wordclock_lib::types::DeviceAddress;
///
/// let config = DeviceSessionConfig::new(DeviceAddress::parse("10.0.0.5").unwrap())
///     .with_language("German")
///     .with_polling_interval(Duration::from_secs(30))
///     .with_word_kind(WordKind::Light);
///
/// assert_eq!(config.polling_interval(), Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSessionConfig {
    /// Address of the clock.
    pub address: DeviceAddress,
    /// Language whose extra words are exposed.
    #[serde(default = "default_language")]
    pub language: String,
    /// Polling interval in seconds.
    #[serde(default = "default_polling_time")]
    pub polling_time: u64,
    /// Whether extra words are switches or lights.
    #[serde(default)]
    pub word_kind: WordKind,
    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_polling_time() -> u64 {
    DEFAULT_POLLING_SECS
}

#[allow(clippy::cast_possible_truncation)]
fn default_timeout_ms() -> u64 {
    HttpConfig::DEFAULT_TIMEOUT.as_millis() as u64
}

impl DeviceSessionConfig {
    /// Creates a configuration with the default language, interval and word
    /// kind.
    #[must_use]
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            language: default_language(),
            polling_time: DEFAULT_POLLING_SECS,
            word_kind: WordKind::default(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Sets the language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the polling interval, truncated to whole seconds.
    #[must_use]
    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_time = interval.as_secs();
        self
    }

    /// Sets how extra words are exposed.
    #[must_use]
    pub fn with_word_kind(mut self, kind: WordKind) -> Self {
        self.word_kind = kind;
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Returns the polling interval.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_time)
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the HTTP configuration derived from this session.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(self.address).with_timeout(self.timeout())
    }

    /// Checks the configuration before a session is created.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ZeroPollingInterval` if the interval is zero.
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.polling_time == 0 {
            return Err(ValueError::ZeroPollingInterval);
        }
        Ok(())
    }
}

/// Runtime changes to a session.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// New language; replaces the extra-word entities when it differs.
    pub language: Option<String>,
    /// New polling interval; reschedules polling when it differs.
    pub polling_interval: Option<Duration>,
}

impl SessionOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a language change.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Requests an interval change.
    #[must_use]
    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = Some(interval);
        self
    }
}
