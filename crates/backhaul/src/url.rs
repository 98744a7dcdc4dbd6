// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint URL composition.

use std::fmt;

/// Fixed first path segment of every relay endpoint.
pub const PATH_PREFIX: &str = "backhaul";

/// One of the two independent inbound/outbound message streams multiplexed
/// over the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Control,
    Data,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoint direction: `in` polls for inbound payloads, `out` sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compose the relay endpoint for one channel and direction.
///
/// Pure given the `tls` flag; callers must read the flag from the current
/// client handle rather than caching it across a TLS reload.
pub fn compose_url(
    tls: bool,
    server: &str,
    client_id: &str,
    channel: Channel,
    direction: Direction,
) -> String {
    let scheme = if tls { "https" } else { "http" };
    format!("{scheme}://{server}/{PATH_PREFIX}/{channel}/{client_id}/{direction}")
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod url_tests;
