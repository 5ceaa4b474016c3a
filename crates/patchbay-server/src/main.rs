//! Patchbay server binary.
//!
//! # Usage
//!
//! ```bash
//! # Stochastic feed with the defaults (capacity 10, 5 s ticks)
//! patchbay-server feed
//!
//! # Fully remote population, faster ticks
//! patchbay-server feed --interval-ms 500 --remote-probability 1.0
//!
//! # One fixed cross-connect built from two interface inodes
//! patchbay-server pair 4026532529 4026532602 1000
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};
use patchbay_server::config::{CONTROL_PLANE_ADDR, DEFAULT_MONITOR_ADDR};
use patchbay_server::{EventBroadcaster, MonitorServer};
use patchbay_sim::{FEED_SEED, PairFeed, PairFeedConfig, Simulator, SimulatorConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Synthetic cross-connect feed server
#[derive(Parser, Debug)]
#[command(name = "patchbay-server")]
#[command(about = "Synthetic cross-connect lifecycle feed with a TCP monitor stream")]
#[command(version)]
struct Args {
    /// Address to serve the monitor stream on
    #[arg(long, default_value = DEFAULT_MONITOR_ADDR)]
    listen: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Random bounded population of local and remote cross-connects
    Feed {
        /// Milliseconds between mutation steps
        #[arg(long, default_value = "5000")]
        interval_ms: u64,

        /// Population cap (at least 1)
        #[arg(long, default_value = "10")]
        max_cross_connects: usize,

        /// Probability that an added cross-connect is a remote pair
        #[arg(long, default_value = "0.5")]
        remote_probability: f32,

        /// Feed RNG seed
        #[arg(long, default_value_t = FEED_SEED)]
        seed: u64,
    },

    /// One fixed cross-connect, alternating UPDATE and DELETE
    Pair {
        /// Source interface inode
        source_inode: String,

        /// Destination interface inode
        dest_inode: String,

        /// Milliseconds between emissions
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Patchbay server starting");
    tracing::info!("Modelling control plane at {}", CONTROL_PLANE_ADDR);

    let broadcaster = EventBroadcaster::default();
    let server = MonitorServer::bind(&args.listen, broadcaster.clone()).await?;
    let shutdown = CancellationToken::new();

    let feed = match args.mode {
        Mode::Feed { interval_ms, max_cross_connects, remote_probability, seed } => {
            let simulator = Simulator::new(SimulatorConfig {
                tick_interval: Duration::from_millis(interval_ms),
                max_cross_connects,
                remote_probability,
                seed,
            })?;
            let shutdown = shutdown.clone();
            tokio::spawn(async move { simulator.run(&broadcaster, shutdown).await })
        },
        Mode::Pair { source_inode, dest_inode, interval_ms } => {
            let pair_feed = PairFeed::new(PairFeedConfig::new(
                source_inode,
                dest_inode,
                Duration::from_millis(interval_ms),
            ));
            let shutdown = shutdown.clone();
            tokio::spawn(async move { pair_feed.run(&broadcaster, shutdown).await })
        },
    };

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = shutdown_signal().await {
                tracing::error!("Signal handler failed: {}", e);
            }
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    server.run(shutdown).await?;
    feed.await?;

    tracing::info!("Patchbay server stopped");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        signal::ctrl_c().await
    }
}
