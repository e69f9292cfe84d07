use clap::{Parser, Subcommand};
use stac_cache::Result;
use stac_cache::commands::{clear_cache, serve, show_config, show_status};

#[derive(Parser)]
#[command(name = "stac-cache")]
#[command(about = "Caching proxy that re-serves STAC imagery metadata as GeoJSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP proxy server
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Delete every cached STAC item
    Clear,
    /// Show where the cache lives and what it holds
    Status,
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            serve(host, port).await?;
        }
        Commands::Clear => {
            clear_cache().await?;
        }
        Commands::Status => {
            show_status().await?;
        }
        Commands::Config => {
            show_config()?;
        }
    }

    Ok(())
}
