//! # Saathi Circle Demo Entry Point
//!
//! Runs the scripted vendor → manager → driver walkthrough and prints what
//! each dashboard would have shown.
//!
//! ## Usage
//! ```text
//! saathi-demo [path/to/saathi.toml]
//!
//! RUST_LOG=debug saathi-demo                  # verbose logging
//! SAATHI_NOTIFICATION_DELAY_MS=0 saathi-demo  # skip the 2 s wait
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (argument path or platform config dir)
//! 3. Start the backend and run the walkthrough
//! 4. Print notifications, then the final report as JSON

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use saathi_app::config::AppConfig;
use saathi_app::demo::run_demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    saathi_app::init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path).context("Failed to load configuration")?;
    info!(
        app = %config.app.name,
        waste_rate = %config.waste_rate(),
        latency_ms = config.simulation.backend_latency_ms,
        "Starting Saathi Circle demo"
    );

    let report = run_demo(config).await?;

    println!("── Notifications ──");
    for n in &report.notifications {
        println!("[{:?}] {}: {}", n.severity, n.title, n.message);
    }

    println!("── Report ──");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
