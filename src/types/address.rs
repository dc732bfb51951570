// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network address of a clock.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::ValueError;

/// IP address and control port of a clock.
///
/// The clock always listens on port 2023; other ports are only useful when
/// pointing the library at a test double.
///
/// # Examples
///
/// ```
/// use wordclock_lib::types::DeviceAddress;
///
/// let address = DeviceAddress::parse("10.0.0.5").unwrap();
/// assert_eq!(address.port(), 2023);
/// assert_eq!(address.base_url(), "http://10.0.0.5:2023");
///
/// assert!(DeviceAddress::parse("wordclock.local").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeviceAddress {
    ip: IpAddr,
    #[serde(default = "default_port")]
    port: u16,
}

impl DeviceAddress {
    /// The clock's fixed control port.
    pub const DEFAULT_PORT: u16 = 2023;

    /// Creates an address on the default control port.
    #[must_use]
    pub const fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            port: Self::DEFAULT_PORT,
        }
    }

    /// Parses an IPv4 or IPv6 literal.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidAddress` if `host` is not an IP literal.
    pub fn parse(host: &str) -> Result<Self, ValueError> {
        host.trim()
            .parse::<IpAddr>()
            .map(Self::new)
            .map_err(|_| ValueError::InvalidAddress(host.to_string()))
    }

    /// Sets a custom port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the IP address.
    #[must_use]
    pub const fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Returns the port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Builds the base URL, e.g. `http://10.0.0.5:2023`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", SocketAddr::new(self.ip, self.port))
    }

    /// Returns a key usable inside entity ids: `wordclock_10_0_0_5`.
    ///
    /// Non-default ports are appended so that two test servers on the
    /// same host get distinct keys.
    #[must_use]
    pub fn device_key(&self) -> String {
        let ip = self.ip.to_string().replace(['.', ':'], "_");
        if self.port == Self::DEFAULT_PORT {
            format!("wordclock_{ip}")
        } else {
            format!("wordclock_{ip}_{}", self.port)
        }
    }
}

fn default_port() -> u16 {
    DeviceAddress::DEFAULT_PORT
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == Self::DEFAULT_PORT {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{}", SocketAddr::new(self.ip, self.port))
        }
    }
}

impl FromStr for DeviceAddress {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<IpAddr> for DeviceAddress {
    fn from(ip: IpAddr) -> Self {
        Self::new(ip)
    }
}

impl From<SocketAddr> for DeviceAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip()).with_port(addr.port())
    }
}
