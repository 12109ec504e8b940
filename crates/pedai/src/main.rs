// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pedai - multi-tenant conversational bot gateway.
//!
//! Binary entry point: parses the CLI, loads configuration, and starts
//! the gateway server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Pedai - multi-tenant conversational bot gateway.
#[derive(Parser, Debug)]
#[command(name = "pedai", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Pedai gateway server.
    Serve,
    /// Print the effective configuration and exit.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match pedai_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            pedai_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            // Secrets stay out of the dump.
            let mut redacted = config.clone();
            if redacted.auth.jwt_secret.is_some() {
                redacted.auth.jwt_secret = Some("***".to_string());
            }
            if redacted.assistant.api_key.is_some() {
                redacted.assistant.api_key = Some("***".to_string());
            }
            match serde_json::to_string_pretty(&redacted) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("pedai: use --help for available commands");
        }
    }
}
