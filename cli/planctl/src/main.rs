//! plan - terminal client for the resource planning service
//!
//! Lists periods, projects and contributors, edits components, and
//! schedules contributors week by week against the planning service.

use anyhow::Result;
use clap::Parser;

use planctl::commands::Cli;
use planctl::error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    planctl::logging::init(cli.verbose);

    // Run the command
    if let Err(e) = cli.run().await {
        // Print error in a user-friendly way
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
