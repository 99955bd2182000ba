// Weekly Inventory - Container inventory to weekly CSV extractor
// Copyright (c) 2025 Weekly Inventory Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use weekly_inventory::cli::{run, Cli};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let exit_code = match run::execute(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            run::EXIT_FAILURE
        }
    };

    process::exit(exit_code);
}
