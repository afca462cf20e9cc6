use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use product_catalog::config::{self, AppConfig};
use product_catalog::database::{self, PgProductStore, ProductStore};
use product_catalog::{build_app, AppState};

#[derive(Parser)]
#[command(name = "product-catalog")]
#[command(about = "Product catalog REST service")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Address to bind (overrides PRODUCTS_API_HOST)")]
    host: Option<String>,

    #[arg(long, global = true, help = "Port to listen on (overrides PRODUCTS_API_PORT)")]
    port: Option<u16>,

    #[arg(long, global = true, help = "PostgreSQL URL (overrides DATABASE_URI)")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create the products table and exit")]
    InitDb,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URI, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = config::config().clone();
    cli.apply(&mut config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::InitDb => init_db(config).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting product catalog in {:?} mode", config.environment);

    let store = database::connect_store(&config.database)
        .await
        .context("failed to open product store")?;
    tracing::info!("Using {} product store", store.backend_name());

    let state = AppState::new(store, config.server.public_url.clone());
    let app = build_app(state, &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Product catalog listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn init_db(config: AppConfig) -> anyhow::Result<()> {
    if config.database.url.is_none() {
        anyhow::bail!("init-db needs a database; set DATABASE_URI or pass --database-url");
    }
    PgProductStore::connect(&config.database)
        .await
        .context("failed to initialize database")?;
    tracing::info!("Database initialized");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
