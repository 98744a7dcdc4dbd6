// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Connection settings for one relay transport.
#[derive(Debug, Clone, clap::Args)]
pub struct TransportConfig {
    /// Relay server authority (host or host:port, no scheme).
    #[arg(long, env = "BACKHAUL_SERVER")]
    pub server: String,

    /// Client identity, used as a path segment in every endpoint URL.
    #[arg(long, env = "BACKHAUL_CLIENT_ID")]
    pub client_id: String,

    /// User-Agent header sent with every request.
    #[arg(long, default_value = "backhaul/0.3", env = "BACKHAUL_USER_AGENT")]
    pub user_agent: String,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = 1000, env = "BACKHAUL_POLL_MS")]
    pub poll_interval_ms: u64,
}

impl TransportConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// TLS material for the relay connection, in PEM form.
///
/// Passed by value at construction and reload; the transport owns its copy,
/// so later mutation by the caller cannot leak into an active client.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Additional trusted root certificates (PEM).
    pub root_certificates: Vec<Vec<u8>>,
    /// Client certificate plus private key (PEM), for mutual TLS.
    pub identity: Option<Vec<u8>>,
}
