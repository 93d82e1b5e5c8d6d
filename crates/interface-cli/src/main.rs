mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::GlobalOptions;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(
        "🚀 OpenInterface CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let globals = GlobalOptions {
        config: cli.config.as_deref(),
        set_values: &cli.set_values,
        quiet: cli.quiet,
    };

    let command_result = match &cli.command {
        Commands::ContactMap(args) => {
            info!("Dispatching to 'contact-map' command.");
            commands::contacts::run_contact_map(args, &globals)
        }
        Commands::Connectivity(args) => {
            info!("Dispatching to 'connectivity' command.");
            commands::contacts::run_connectivity(args, &globals)
        }
        Commands::NearbyConnectivity(args) => {
            info!("Dispatching to 'nearby-connectivity' command.");
            commands::contacts::run_nearby_connectivity(args, &globals)
        }
        Commands::Sasa(args) => {
            info!("Dispatching to 'sasa' command.");
            commands::surface::run_sasa(args, &globals)
        }
        Commands::BuriedFactors(args) => {
            info!("Dispatching to 'buried-factors' command.");
            commands::surface::run_buried_factors(args, &globals)
        }
        Commands::SasaBuried(args) => {
            info!("Dispatching to 'sasa-buried' command.");
            commands::surface::run_sasa_buried(args, &globals)
        }
        Commands::ContactingResidues(args) => {
            info!("Dispatching to 'contacting-residues' command.");
            commands::interface::run_contacting_residues(args, &globals)
        }
    };

    // stdout carries the CSV, so status goes to stderr.
    match &command_result {
        Ok(()) => {
            info!("✅ Command completed successfully.");
            if !cli.quiet {
                eprintln!("✅ Command completed successfully.");
            }
        }
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
