use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use img_annotate_api::{app, config, is_production, sessions::spawn_sweeper, AppState};

#[derive(Parser)]
#[command(name = "img-annotate-api")]
#[command(about = "Image annotation backend: users, projects, uploads and annotation coords")]
#[command(version)]
struct Args {
    #[arg(long, env = "PORT", help = "Port to listen on (default 3001)")]
    port: Option<u16>,

    #[arg(long, help = "Use the in-memory store even when DATABASE_URL is set")]
    in_memory: bool,

    #[arg(long, env = "STATIC_DIR", help = "Built frontend to serve on non-API paths")]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("img_annotate_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.static_dir {
        config.server.static_dir = Some(dir);
    }
    tracing::info!("Starting img-annotate-api in {:?} mode", config.environment);

    if is_production!() && (args.in_memory || config.database.url.is_none()) {
        tracing::warn!("Production mode without a database: uploads and sessions are lost on restart");
    }

    let port = config.server.port;
    let sweep_every = Duration::from_secs(config.session.sweep_interval_secs.max(1));

    let state = AppState::from_config(config, args.in_memory)
        .await
        .context("failed to initialise store")?;

    let _sweeper = spawn_sweeper(state.sessions.clone(), sweep_every);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;

    Ok(())
}
