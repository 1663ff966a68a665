//! Aster CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the key-value table (idempotent)
//! aster-cli migrate
//!
//! # Ping a running server
//! aster-cli health --base-url http://localhost:3000
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the `kv_store` table if it does not exist
//! - `health` - Query a running server's liveness endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use aster_server::db;

#[derive(Parser)]
#[command(name = "aster-cli")]
#[command(author, version, about = "Aster Boutique CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the key-value table if it does not exist
    Migrate,
    /// Query a running server's liveness endpoint
    Health {
        /// Base URL of the server
        #[arg(long, default_value = "http://localhost:3000")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

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
        Commands::Migrate => migrate().await,
        Commands::Health { base_url } => health(&base_url).await,
    }
}

async fn migrate() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = std::env::var("ASTER_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "ASTER_DATABASE_URL must be set")?;

    let pool = db::create_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    println!("kv_store table is in place");
    Ok(())
}

async fn health(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let response = reqwest::get(&url).await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;

    println!("{status}: {body}");
    if !status.is_success() {
        return Err(format!("server unhealthy: {status}").into());
    }
    Ok(())
}
