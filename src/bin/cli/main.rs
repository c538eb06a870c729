//! typegraph CLI - compile and query the demo schema.
//!
//! Usage:
//!   typegraph sdl                                  # Print the compiled schema
//!   typegraph query '{ hero { name } }'            # Execute a query
//!   typegraph query '...' --variables '{"id": "1000"}'
//!   typegraph --config typegraph.toml sdl          # Use a compiler config

mod starwars;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use typegraph::{CompilerConfig, Schema};

#[derive(Parser)]
#[command(name = "typegraph")]
#[command(about = "typegraph - compile GraphQL type graphs into executable schemas", long_about = None)]
struct Cli {
    /// Compiler configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled demo schema in SDL
    Sdl,

    /// Execute a query against the demo schema
    Query {
        /// GraphQL query document
        query: String,

        /// Variables as a JSON object
        #[arg(short, long)]
        variables: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CompilerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CompilerConfig::default(),
    };
    debug!(?config, "compiler config");

    let schema = starwars::build(Schema::builder().config(config))?;

    match cli.command {
        Commands::Sdl => {
            println!("{}", schema.sdl()?);
        }

        Commands::Query { query, variables } => {
            let variables = variables
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()
                .context("variables must be a JSON object")?;
            let response = schema.execute_with(&query, variables, None).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.is_err() {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
