//! Burrow - one-shot connectivity probe for clusters behind a tunnel.
//!
//! Reads connection parameters from the environment, opens a single
//! connection through the pre-established tunnel, runs one introspection
//! query, prints the result, and exits. Any failure prints a categorized
//! message with remediation hints to stderr and exits non-zero.

mod report;

use burrow_core::{logging, BurrowResult, ClusterClient, ConnectionConfig, QueryService};

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init() {
        eprint!("{}", report::render_failure(&e));
        std::process::exit(1);
    }

    println!("Cluster Connectivity Probe");
    println!("==========================");

    if let Err(e) = run().await {
        eprint!("{}", report::render_failure(&e));
        std::process::exit(1);
    }
}

/// Load configuration, connect, query, and report.
///
/// The client is closed before a query error is allowed to propagate, so
/// the connection and its driver task are released on every exit path.
async fn run() -> BurrowResult<()> {
    let config = ConnectionConfig::from_env()?;

    tracing::info!(cluster = %config.hostname, "Connecting to cluster");
    tracing::info!("Through tunnel address: {}:{}", config.tunnel_addr, config.port);

    let client = ClusterClient::connect(&config).await?;
    let info = QueryService::connection_info(&client).await;
    client.close().await;
    let info = info?;

    print!("{}", report::render_info(&config, &info));
    println!("\nConnection test completed successfully!");

    Ok(())
}
