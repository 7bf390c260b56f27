// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "metavasi")]
#[command(about = "Zero-downtime blue/green DNS cutover for load-balanced services")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new metavasi.yml configuration file
    Init {
        /// Hosted zone DNS name
        #[arg(long)]
        zone: Option<String>,

        /// Weighted alias to migrate
        #[arg(long)]
        alias: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Run the blue/green cutover for the configured alias
    Cutover {
        /// Skip confirmation prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the configured cutover
    Status,
}
