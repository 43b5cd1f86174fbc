//! # Mesh Registry Node
//!
//! Entry point: parse arguments, install logging, run to completion, print
//! the snapshot digest on stdout.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use registry_node::{run, Args};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let report = run(&args).await?;

    println!("{}", report.digest);
    Ok(())
}
