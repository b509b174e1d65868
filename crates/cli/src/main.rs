//! Hearthwood CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! hw-cli migrate
//!
//! # Seed the product catalog from a YAML file
//! hw-cli seed catalog catalog.yaml
//!
//! # Replace the whole catalog instead of upserting
//! hw-cli seed catalog catalog.yaml --replace
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed catalog` - Seed the product catalog from YAML

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hw-cli")]
#[command(author, version, about = "Hearthwood CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed database content
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed the product catalog from a YAML file
    Catalog {
        /// Path to the catalog YAML file
        file: String,

        /// Delete all existing products before seeding
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file, replace } => {
                commands::seed::catalog(&file, replace).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_takes_positional_file() {
        let cli = Cli::try_parse_from(["hw-cli", "seed", "catalog", "catalog.yaml", "--replace"])
            .expect("valid invocation");

        match cli.command {
            Commands::Seed {
                target: SeedTarget::Catalog { file, replace },
            } => {
                assert_eq!(file, "catalog.yaml");
                assert!(replace);
            }
            Commands::Migrate => panic!("expected seed catalog"),
        }
    }

    #[test]
    fn test_seed_catalog_requires_file() {
        assert!(Cli::try_parse_from(["hw-cli", "seed", "catalog"]).is_err());
    }
}
