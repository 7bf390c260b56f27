// ABOUTME: Entry point for the metavasi CLI application.
// ABOUTME: Parses arguments and drives the confirmation-gated cutover sequence.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use metavasi::config::{self, Config};
use metavasi::cutover::{CutoverError, Session};
use metavasi::directory::{AwsDirectory, RecordOps, resolve_backend_name};
use metavasi::error::{Error, Result};
use std::env;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { zone, alias, force } => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            config::init_config(&cwd, zone.as_deref(), alias.as_deref(), force)
        }
        Commands::Cutover { yes } => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            let config = Config::discover(&cwd)?;
            cutover(config, yes).await
        }
        Commands::Status => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            Config::discover(&cwd).map(|config| {
                println!("Zone: {}", config.zone);
                println!("Alias: {}", config.alias.trimmed());
                println!("Environment: {} ({})", config.environment, config.region);
                println!(
                    "Bleed: {} points every {}s",
                    config.bleed.step,
                    config.bleed.interval.as_secs()
                );
                // TODO: Query the live blue/green weight split for the alias
            })
        }
    }
}

/// Run the full cutover for the configured alias.
///
/// Every destructive step is gated on an operator confirmation; a denied
/// prompt aborts the workflow before the step performs any mutation.
async fn cutover(config: Config, assume_yes: bool) -> Result<()> {
    let directory = AwsDirectory::connect(&config.region).await;

    println!(
        "Cutting over {} in zone {}",
        config.alias.trimmed(),
        config.zone
    );

    let zone = directory
        .find_zone(&config.zone)
        .await
        .map_err(|e| Error::Directory(e.to_string()))?
        .ok_or_else(|| Error::ZoneNotFound(config.zone.to_string()))?;
    println!("  → Found hosted zone {}", zone.id);

    let blue = directory
        .find_record(&zone, &config.alias)
        .await
        .map_err(|e| Error::Directory(e.to_string()))?
        .ok_or_else(|| Error::RecordNotFound(config.alias.to_string()))?;
    println!("  → Found blue record {} (weight {})", blue.set_id, blue.weight);

    let source = resolve_backend_name(&directory, &blue.value)
        .await
        .map_err(|e| Error::Directory(e.to_string()))?
        .ok_or_else(|| Error::BackendNotFound(blue.value.clone()))?;
    println!("  → Blue load balancer: {source}");

    let session = Session::new(config, zone, blue, source);

    confirm("Proceed with load balancer replication?", assume_yes)?;
    println!(
        "  → Replicating load balancer as {}...",
        session.replica_name()
    );
    let session = session.replicate(&directory).await.map_err(cutover_err)?;

    println!("  → Waiting for replica members to enter service...");
    let session = session.wait_ready(&directory).await.map_err(cutover_err)?;

    println!("  → Publishing green record...");
    let session = session.publish_green(&directory).await.map_err(cutover_err)?;

    confirm("Proceed with blue/green traffic shift?", assume_yes)?;
    println!("  → Shifting traffic to {}...", session.replica().name);
    let session = session.shift_traffic(&directory).await.map_err(cutover_err)?;

    confirm(
        &format!(
            "Proceed with deletion of load balancer {}?",
            session.source()
        ),
        assume_yes,
    )?;
    println!("  → Deleting blue load balancer...");
    let session = session
        .retire_blue_resource(&directory)
        .await
        .map_err(cutover_err)?;

    confirm("Proceed with deletion of the blue record?", assume_yes)?;
    println!("  → Deleting blue record...");
    let session = session
        .delete_blue_record(&directory)
        .await
        .map_err(cutover_err)?;

    let replica = session.finish();
    println!("  ✓ Cutover complete: {} now serves all traffic", replica.name);

    Ok(())
}

fn cutover_err(e: CutoverError) -> Error {
    Error::Cutover(e.to_string())
}

/// Ask the operator before a destructive step.
fn confirm(prompt: &str, assume_yes: bool) -> Result<()> {
    if assume_yes {
        return Ok(());
    }

    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    if matches!(line.trim(), "y" | "Y" | "yes") {
        Ok(())
    } else {
        println!("Stopping...");
        Err(Error::Aborted)
    }
}
