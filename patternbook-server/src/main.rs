//! patternbook - amigurumi pattern catalog server

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use patternbook_core::ServerConfig;
use patternbook_server::db::{migrations, pool};
use patternbook_server::http::server::run_server;

/// Command-line arguments; each flag overrides the environment-derived
/// configuration.
#[derive(Parser, Debug)]
#[command(name = "patternbook", about = "Amigurumi pattern catalog API")]
struct Cli {
    /// API bind address
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Static asset server bind address
    #[arg(long)]
    asset_bind: Option<SocketAddr>,

    /// SQLite connection string
    #[arg(long)]
    database_url: Option<String>,

    /// Directory uploaded images are stored in
    #[arg(long)]
    uploads_dir: Option<PathBuf>,

    /// Directory of static HTML documentation pages
    #[arg(long)]
    pages_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(bind) = cli.asset_bind {
        config.asset_addr = bind;
    }
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    if let Some(dir) = cli.uploads_dir {
        config.uploads_dir = dir;
    }
    if let Some(dir) = cli.pages_dir {
        config.pages_dir = dir;
    }

    info!("Opening database {}", config.database_url);
    let pool = pool::create_pool(&config.database_url).await?;
    migrations::run(&pool).await?;

    run_server(pool, config).await
}
