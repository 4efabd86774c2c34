use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alpha_backoffice::{app, config, database::DatabaseManager, AppState};

#[derive(Parser)]
#[command(name = "alpha-backoffice")]
#[command(about = "Back-office administration API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Start the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Apply database migrations before serving")]
        migrate: bool,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are visible to the config
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Arc::new(config::config().clone());
    tracing::info!("Starting Alpha BackOffice API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; sign-in and protected routes will reject every request");
    }
    if config.security.admin_api_key.is_empty() {
        tracing::warn!("ADMIN_API_KEY is not set; admin routes will reject every request");
    }

    let db = DatabaseManager::connect_lazy(&config.database).context("failed to configure database pool")?;

    match cli.command.unwrap_or(Command::Serve { migrate: false }) {
        Command::Migrate => {
            db.migrate().await.context("failed to apply migrations")?;
            db.close().await;
            Ok(())
        }
        Command::Serve { migrate } => {
            if migrate {
                db.migrate().await.context("failed to apply migrations")?;
            }
            serve(config, db).await
        }
    }
}

async fn serve(config: Arc<config::AppConfig>, db: DatabaseManager) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Alpha BackOffice API listening on http://{}", bind_addr);

    let router = app(AppState::new(config, db));
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
