// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `wordclock_lib` library.
//!
//! Failures are split by where they happen: value validation, the HTTP
//! transport, decoding of the plaintext status replies, and session
//! management.

use std::time::Duration;

use thiserror::Error;

use crate::entity::EntityId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The HTTP request to the clock failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The clock answered with something we could not decode.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during session management.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// No session is registered under the given id.
    #[error("session not found")]
    SessionNotFound,

    /// No entity is registered under the given id.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity cannot take a color or brightness.
    #[error("entity does not support color or brightness")]
    CapabilityNotSupported,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// The address is not an IPv4 or IPv6 literal.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A polling interval of zero was requested.
    #[error("polling interval must be greater than zero")]
    ZeroPollingInterval,
}

/// Errors raised while talking to the clock over HTTP.
///
/// Every request is attempted exactly once; retrying is up to the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The clock could not be reached (connection refused, DNS, reset...).
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The clock answered with a status other than 200.
    #[error("unexpected HTTP status {0}")]
    NonOkStatus(u16),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Errors related to decoding the clock's plaintext replies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The reply does not have the expected shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to session configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// A session for this address already exists.
    #[error("a session for {0} is already registered")]
    DuplicateAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
