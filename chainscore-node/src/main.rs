use anyhow::Result;
use chainscore_api::{start_server, AppState};
use chainscore_session::{DigestEvaluator, Evaluator};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "ChainScore node — on-chain credit scoring service")]
struct Args {
    #[arg(long, default_value = "0.0.0.0:3000")]
    listen: SocketAddr,
    /// Artificial evaluation latency, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    eval_delay_ms: u64,
    /// Evaluation timeout, in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    eval_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    info!("Starting ChainScore node...");

    // 2. Evaluator (deterministic digest-derived backend stand-in)
    let evaluator: Arc<dyn Evaluator> =
        Arc::new(DigestEvaluator::new(Duration::from_millis(args.eval_delay_ms)));

    // 3. API
    let state = AppState::new(evaluator, Duration::from_millis(args.eval_timeout_ms));
    let listen = args.listen;
    tokio::spawn(async move {
        if let Err(e) = start_server(listen, state).await {
            tracing::error!("API server failed: {}", e);
        }
    });

    info!("Node running. Press Ctrl+C to stop.");
    signal::ctrl_c().await?;

    Ok(())
}
