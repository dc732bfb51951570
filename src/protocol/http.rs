// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the WordClock.

use std::time::Duration;

use reqwest::Client;

use crate::error::TransportError;
use crate::protocol::{DeviceResponse, Request};
use crate::types::DeviceAddress;

// ============================================================================
// HttpConfig
// ============================================================================

/// Configuration for the HTTP connection to one clock.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wordclock_lib::protocol::HttpConfig;
/// use wordclock_lib::types::DeviceAddress;
///
/// let address = DeviceAddress::parse("10.0.0.5").unwrap();
/// let config = HttpConfig::new(address).with_timeout(Duration::from_secs(3));
/// assert_eq!(config.timeout(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    address: DeviceAddress,
    timeout: Duration,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given clock.
    #[must_use]
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the address.
    #[must_use]
    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, TransportError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::ClientBuild)?;

        Ok(HttpClient {
            base_url: self.address.base_url(),
            address: self.address,
            timeout: self.timeout,
            client,
        })
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for one clock.
///
/// Cloning is cheap and all clones share the same connection pool; the pool
/// is released once the last clone is dropped.
///
/// # Examples
///
/// ```no_run
/// use wordclock_lib::protocol::{HttpConfig, Request};
/// use wordclock_lib::types::DeviceAddress;
///
/// # async fn example() -> wordclock_lib::Result<()> {
/// let address = DeviceAddress::parse("10.0.0.5")?;
/// let client = HttpConfig::new(address).into_client()?;
/// let status = client.send(&Request::Status).await?;
/// println!("{}", status.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    address: DeviceAddress,
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(address: DeviceAddress) -> Result<Self, TransportError> {
        HttpConfig::new(address).into_client()
    }

    /// Returns the address of the clock.
    #[must_use]
    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Returns the base URL of the clock.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a typed request.
    ///
    /// # Errors
    ///
    /// See [`send_path`](Self::send_path).
    pub async fn send(&self, request: &Request) -> Result<DeviceResponse, TransportError> {
        self.send_path(&request.path()).await
    }

    /// Issues exactly one GET for `path` and returns the body on HTTP 200.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Timeout` if the request timed out,
    /// `TransportError::NonOkStatus` for any status other than 200 and
    /// `TransportError::Unreachable` for every other failure.
    pub async fn send_path(&self, path: &str) -> Result<DeviceResponse, TransportError> {
        let url = self.build_url(path);

        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_error(&e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!(url = %url, status = status.as_u16(), "Unexpected HTTP status");
            return Err(TransportError::NonOkStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.map_error(&e))?;

        tracing::debug!(body = %body, "Received HTTP response");

        Ok(DeviceResponse::new(body))
    }

    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Unreachable(error.to_string())
        }
    }
}
