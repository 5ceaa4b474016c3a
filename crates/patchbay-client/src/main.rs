//! Patchbay monitor client binary.
//!
//! # Usage
//!
//! ```bash
//! # Subscribe to a local server and log every event
//! patchbay-client --connect 127.0.0.1:5007
//! ```

use clap::Parser;
use patchbay_client::MonitorClient;
use patchbay_proto::{CrossConnectEvent, Endpoint};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Monitor stream client
#[derive(Parser, Debug)]
#[command(name = "patchbay-client")]
#[command(about = "Subscribes to a patchbay monitor stream and logs events")]
#[command(version)]
struct Args {
    /// Monitor server address
    #[arg(long, default_value = "127.0.0.1:5007")]
    connect: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Connecting to {}", args.connect);
    let mut client = MonitorClient::connect(&args.connect).await?;
    tracing::info!("Subscribed, waiting for events");

    let mut received = 0_u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            },
            event = client.next_event() => match event? {
                Some(event) => {
                    received += 1;
                    log_event(&event);
                },
                None => {
                    tracing::info!("Stream ended");
                    break;
                },
            },
        }
    }

    tracing::info!("Received {} events", received);
    Ok(())
}

fn log_event(event: &CrossConnectEvent) {
    tracing::info!(
        "{} {} ({} -> {})",
        event.kind,
        event.cross_connect.id,
        endpoint_summary(&event.cross_connect.source),
        endpoint_summary(&event.cross_connect.destination),
    );
}

fn endpoint_summary(endpoint: &Endpoint) -> String {
    match endpoint {
        Endpoint::Local(connection) => format!("local/{}/{}", connection.id, connection.mechanism),
        Endpoint::Remote(remote) => format!("remote/{}/{}", remote.id, remote.mechanism),
    }
}
