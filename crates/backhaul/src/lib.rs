// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backhaul: duplex messaging for a single client over an HTTP relay.
//!
//! The relay only speaks synchronous request/response, so inbound delivery
//! is emulated by two background polling loops (the `control` and `data`
//! channels) while outbound messages are POSTed directly from the caller.
//! The TLS configuration can be swapped while polling is in flight; the
//! client and its scheme flag are replaced together so a composed URL never
//! disagrees with the client that issues the request.

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod transport;
pub mod url;

pub use client::RelayClient;
pub use config::{TlsConfig, TransportConfig};
pub use error::SendError;
pub use transport::{HttpTransport, PayloadHandler, ResponseEnvelope};
pub use url::{compose_url, Channel, Direction, PATH_PREFIX};
