// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Failure classes of the outbound send path.
///
/// `Status` is the application-level case: the relay answered with a 4xx or
/// 5xx status. The serialized response envelope is still available on that
/// variant via [`SendError::envelope`], since a failing status does not make
/// the response itself unusable.
#[derive(Debug)]
pub enum SendError {
    /// The request could not be issued at all; no response was obtained.
    Request(reqwest::Error),
    /// A response arrived but its body could not be read in full.
    Read(reqwest::Error),
    /// The relay's response body was not valid JSON.
    Decode(serde_json::Error),
    /// The response envelope could not be serialized for return.
    Serialize(serde_json::Error),
    /// The relay answered with status >= 400.
    Status { code: u16, reason: String, envelope: Vec<u8> },
}

impl SendError {
    /// Serialized envelope bytes carried alongside a `Status` error.
    pub fn envelope(&self) -> Option<&[u8]> {
        match self {
            Self::Status { envelope, .. } => Some(envelope),
            _ => None,
        }
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "cannot issue HTTP request: {e}"),
            Self::Read(e) => write!(f, "cannot read HTTP response body: {e}"),
            Self::Decode(e) => write!(f, "cannot decode HTTP response body: {e}"),
            Self::Serialize(e) => write!(f, "cannot serialize HTTP response envelope: {e}"),
            Self::Status { reason, .. } => f.write_str(reason),
        }
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) | Self::Read(e) => Some(e),
            Self::Decode(e) | Self::Serialize(e) => Some(e),
            Self::Status { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
