use std::path::PathBuf;
use std::process;

use clap::Parser;
use kroolo_cli::{init_tracing, run_server, Config};
use tracing::error;

#[derive(Parser)]
#[command(name = "kroolo")]
#[command(about = "Kroolo - AI epic generation API server")]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,

    /// Load environment variables from this file instead of .env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            if let Err(e) = dotenvy::from_path(path) {
                eprintln!("Error: failed to load {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    init_tracing();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(port) = cli.port {
        config.port = port;
    }

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        process::exit(1);
    }
}
