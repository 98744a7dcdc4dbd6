// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client wrapper bound to one TLS configuration and user agent.

use std::sync::Once;
use std::time::Duration;

use anyhow::Context;

use crate::config::TlsConfig;

/// One-time rustls crypto provider installation guard.
static CRYPTO_PROVIDER: Once = Once::new();

/// Thin wrapper over `reqwest::Client` exposing the two primitives the
/// transport needs: a plain GET and a POST with headers.
///
/// A `RelayClient` is immutable once built. TLS reconfiguration builds a
/// fresh client rather than mutating one that concurrent pollers may be
/// using.
pub struct RelayClient {
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new(tls: Option<&TlsConfig>, user_agent: &str) -> anyhow::Result<Self> {
        CRYPTO_PROVIDER.call_once(|| {
            let _ = rustls::crypto::ring::default_provider().install_default();
        });

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10));

        if let Some(tls) = tls {
            builder = builder.use_rustls_tls();
            for pem in &tls.root_certificates {
                let cert = reqwest::Certificate::from_pem(pem)
                    .context("invalid root certificate PEM")?;
                builder = builder.add_root_certificate(cert);
            }
            if let Some(pem) = &tls.identity {
                let identity = reqwest::Identity::from_pem(pem)
                    .context("invalid client identity PEM")?;
                builder = builder.identity(identity);
            }
        }

        Ok(Self { client: builder.build().context("cannot build HTTP client")? })
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(url).send().await
    }

    pub async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> reqwest::Result<reqwest::Response> {
        let mut req = self.client.post(url).body(body);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req.send().await
    }
}
