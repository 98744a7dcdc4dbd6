// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `backhaul` — poll a relay's inbound channels and forward stdin lines to
//! the data channel.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info};

use backhaul::{Channel, HttpTransport, PayloadHandler, TlsConfig, TransportConfig};

#[derive(Debug, Parser)]
#[command(name = "backhaul", about = "Duplex messaging client over an HTTP relay.")]
struct RelayArgs {
    #[command(flatten)]
    transport: TransportConfig,

    /// Extra trusted CA certificate (PEM file). Enables HTTPS.
    #[arg(long, env = "BACKHAUL_CA_CERT")]
    ca_cert: Option<std::path::PathBuf>,

    /// Client certificate and key (PEM file) for mutual TLS.
    #[arg(long, env = "BACKHAUL_IDENTITY")]
    identity: Option<std::path::PathBuf>,

    /// Shutdown grace period in milliseconds.
    #[arg(long, default_value_t = 2000)]
    grace_ms: u64,
}

#[tokio::main]
async fn main() {
    let args = RelayArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(args).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: RelayArgs) -> anyhow::Result<()> {
    let tls = load_tls(&args)?;

    let handler: PayloadHandler = Arc::new(|payload: &[u8], channel: Channel| {
        println!("[{channel}] {}", String::from_utf8_lossy(payload));
    });

    let transport = HttpTransport::new(args.transport.clone(), tls, handler)?;
    transport.start().await;
    info!(server = %args.transport.server, client_id = %args.transport.client_id, "polling started");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => match transport.send(line.as_bytes(), Channel::Data).await {
                    Ok(Some(envelope)) => println!("{}", String::from_utf8_lossy(&envelope)),
                    Ok(None) => break,
                    Err(e) => error!(err = %e, "send failed"),
                },
                None => break,
            },
        }
    }

    transport.stop(Duration::from_millis(args.grace_ms)).await;
    Ok(())
}

fn load_tls(args: &RelayArgs) -> anyhow::Result<Option<TlsConfig>> {
    if args.ca_cert.is_none() && args.identity.is_none() {
        return Ok(None);
    }
    let mut tls = TlsConfig::default();
    if let Some(path) = &args.ca_cert {
        let pem = std::fs::read(path)
            .with_context(|| format!("cannot read CA certificate {}", path.display()))?;
        tls.root_certificates.push(pem);
    }
    if let Some(path) = &args.identity {
        let pem = std::fs::read(path)
            .with_context(|| format!("cannot read client identity {}", path.display()))?;
        tls.identity = Some(pem);
    }
    Ok(Some(tls))
}
