// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background polling loops, one per inbound channel.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::TransportConfig;
use crate::transport::{PayloadHandler, Shared};
use crate::url::{compose_url, Channel, Direction};

/// Spawn the polling loop for one channel.
///
/// Each iteration snapshots the current client handle, fetches the channel's
/// inbound endpoint, and hands the body to the payload handler inline, so
/// dispatches within a channel are strictly ordered. Request failures are
/// logged and the loop keeps its cadence; a body read failure re-polls
/// immediately without sleeping. The loop exits only when `cancel` fires,
/// and never mid-request.
pub(crate) fn spawn_channel_poller(
    shared: Arc<Shared>,
    config: TransportConfig,
    channel: Channel,
    handler: PayloadHandler,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let interval = config.poll_interval();

    tokio::spawn(async move {
        loop {
            if cancel.is_cancelled() {
                break;
            }

            let handle = Arc::clone(&*shared.handle.read().await);
            let url =
                compose_url(handle.tls, &config.server, &config.client_id, channel, Direction::In);

            match handle.client.get(&url).await {
                Err(e) => {
                    tracing::debug!(channel = %channel, err = %e, "poll request failed");
                }
                Ok(resp) => match resp.bytes().await {
                    Err(e) => {
                        tracing::error!(channel = %channel, err = %e, "cannot read poll response body");
                        continue;
                    }
                    Ok(body) => {
                        (handler)(&body, channel);
                    }
                },
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::debug!(channel = %channel, "poller stopped");
    })
}
