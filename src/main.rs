use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use wiretree::config::Config;
use wiretree::demo;
use wiretree::logging::init_tracing;
use wiretree::server::WiretreeServer;

#[derive(Parser)]
#[command(name = "wiretree")]
#[command(about = "Server-driven UI over plain view trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo task board
    Serve {
        /// Config file (defaults to the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override `server.bind_addr`
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => serve(config, bind).await,
    }
}

async fn serve(config_path: Option<PathBuf>, bind: Option<String>) -> anyhow::Result<()> {
    let mut config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
        config.validate()?;
    }

    let router = demo::router().context("demo routes failed to compile")?;
    let store = Arc::new(demo::store());

    let mut server = WiretreeServer::new(router, store, config);
    let addr = server.bind().await.context("failed to bind")?;
    tracing::info!(%addr, "Serving demo task board");

    server.run().await?;
    Ok(())
}
