// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport lifecycle: construction, poller start/stop, TLS reload, and the
//! outbound send path.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::RelayClient;
use crate::config::{TlsConfig, TransportConfig};
use crate::error::SendError;
use crate::poller::spawn_channel_poller;
use crate::url::{compose_url, Channel, Direction};

/// Callback invoked inline by a poller with (payload bytes, channel).
///
/// The transport does not observe the handler's outcome; failures inside it
/// are the handler's responsibility.
pub type PayloadHandler = Arc<dyn Fn(&[u8], Channel) + Send + Sync>;

/// Structured wrapper built around the relay's response to a send.
///
/// Metadata keys are the header names as the HTTP client normalizes them
/// (lowercase); multi-valued headers are joined with `;`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub body: serde_json::Value,
    pub metadata: BTreeMap<String, String>,
}

/// The client and its scheme flag, replaced together on TLS reload so a
/// composed URL always matches the client that issues the request.
pub(crate) struct ClientHandle {
    pub(crate) client: RelayClient,
    pub(crate) tls: bool,
}

/// State shared between the transport and its pollers.
pub(crate) struct Shared {
    pub(crate) handle: RwLock<Arc<ClientHandle>>,
}

/// Duplex message transport over an HTTP request/response relay.
///
/// One instance per logical connection. Inbound payloads arrive through two
/// background pollers (control and data channels); outbound messages go out
/// synchronously through [`HttpTransport::send`].
pub struct HttpTransport {
    config: TransportConfig,
    handler: PayloadHandler,
    shared: Arc<Shared>,
    cancel: RwLock<CancellationToken>,
    pollers: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpTransport {
    /// Build a transport bound to `tls` (None = plain HTTP) and the
    /// configured user agent. Fails only if the HTTP client cannot be built.
    pub fn new(
        config: TransportConfig,
        tls: Option<TlsConfig>,
        handler: PayloadHandler,
    ) -> anyhow::Result<Self> {
        let client = RelayClient::new(tls.as_ref(), &config.user_agent)?;
        let shared = Arc::new(Shared {
            handle: RwLock::new(Arc::new(ClientHandle { client, tls: tls.is_some() })),
        });
        Ok(Self {
            config,
            handler,
            shared,
            cancel: RwLock::new(CancellationToken::new()),
            pollers: Mutex::new(Vec::new()),
        })
    }

    /// Launch the control and data pollers and return immediately.
    ///
    /// Not idempotent: calling `start` twice spawns a second pair of pollers
    /// against the same endpoints. Guarding against that is the caller's
    /// responsibility.
    pub async fn start(&self) {
        let cancel = CancellationToken::new();
        *self.cancel.write().await = cancel.clone();

        let mut pollers = self.pollers.lock().await;
        for channel in [Channel::Control, Channel::Data] {
            pollers.push(spawn_channel_poller(
                Arc::clone(&self.shared),
                self.config.clone(),
                channel,
                Arc::clone(&self.handler),
                cancel.clone(),
            ));
        }
        tracing::info!(server = %self.config.server, "transport started");
    }

    /// Signal shutdown, then wait up to `grace` for the pollers to confirm
    /// exit.
    ///
    /// Cancellation is cooperative: an in-flight request or handler call is
    /// never interrupted, so a poller may outlive the grace period. Such a
    /// poller is logged and left to exit on its own at its next cancellation
    /// check; it will not issue further requests.
    pub async fn stop(&self, grace: Duration) {
        self.cancel.read().await.cancel();

        let deadline = tokio::time::Instant::now() + grace;
        let mut pollers = self.pollers.lock().await;
        for poller in pollers.drain(..) {
            match tokio::time::timeout_at(deadline, poller).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(err = %e, "poller task failed"),
                Err(_) => {
                    tracing::warn!("poller did not confirm exit within the grace period");
                }
            }
        }
        tracing::info!(server = %self.config.server, "transport stopped");
    }

    /// Swap in a new TLS configuration (None = plain HTTP).
    ///
    /// Builds a fresh client and replaces the shared client+flag pair in a
    /// single write. Requests already in flight finish on the old client;
    /// every request started after this returns uses the new one.
    pub async fn reload_tls(&self, tls: Option<TlsConfig>) -> anyhow::Result<()> {
        let enabled = tls.is_some();
        let client = RelayClient::new(tls.as_ref(), &self.config.user_agent)?;
        let handle = Arc::new(ClientHandle { client, tls: enabled });
        *self.shared.handle.write().await = handle;
        tracing::info!(tls = enabled, "TLS configuration reloaded");
        Ok(())
    }

    /// POST `message` to the channel's outbound endpoint and return the
    /// serialized response envelope.
    ///
    /// Returns `Ok(None)` without issuing a request when the transport has
    /// been stopped; callers that need to distinguish "stopped" from "sent"
    /// must track transport state themselves. A status >= 400 surfaces as
    /// [`SendError::Status`], which still carries the envelope bytes.
    pub async fn send(
        &self,
        message: &[u8],
        channel: Channel,
    ) -> Result<Option<Vec<u8>>, SendError> {
        if self.cancel.read().await.is_cancelled() {
            return Ok(None);
        }

        let handle = Arc::clone(&*self.shared.handle.read().await);
        let url =
            compose_url(handle.tls, &self.config.server, &self.config.client_id, channel, Direction::Out);

        tracing::trace!(channel = %channel, bytes = message.len(), "posting outbound message");
        let resp = handle
            .client
            .post(&url, &[("content-type", "application/json")], message.to_vec())
            .await
            .map_err(SendError::Request)?;

        let status = resp.status();
        let mut metadata = BTreeMap::new();
        for name in resp.headers().keys() {
            let joined = resp
                .headers()
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(";");
            metadata.insert(name.as_str().to_owned(), joined);
        }

        let body = resp.bytes().await.map_err(SendError::Read)?;
        let body: serde_json::Value =
            serde_json::from_slice(&body).map_err(SendError::Decode)?;

        let envelope = ResponseEnvelope { status_code: status.as_u16(), body, metadata };
        let bytes = serde_json::to_vec(&envelope).map_err(SendError::Serialize)?;

        if status.as_u16() >= 400 {
            let reason = status
                .canonical_reason()
                .map(str::to_owned)
                .unwrap_or_else(|| status.as_u16().to_string());
            return Err(SendError::Status { code: status.as_u16(), reason, envelope: bytes });
        }

        Ok(Some(bytes))
    }

    /// Endpoint URL for one direction and channel under the current TLS
    /// state. Reads the flag from the live client handle, never a cached
    /// copy.
    pub async fn url_for(&self, direction: Direction, channel: Channel) -> String {
        let handle = Arc::clone(&*self.shared.handle.read().await);
        compose_url(handle.tls, &self.config.server, &self.config.client_id, channel, direction)
    }
}
