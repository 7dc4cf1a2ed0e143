use anyhow::{Context, Result};
use clap::Parser;
use invigil::{create_router, AppState, Config};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "invigil", about = "Live proctoring session engine")]
struct Args {
    /// Path to the configuration file (stem, without extension)
    #[arg(short, long, default_value = "config/invigil")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);
    info!(
        "Analyzers: distraction={} emotion={}",
        cfg.analyzers.distraction_url, cfg.analyzers.emotion_url
    );

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let state = AppState::new(cfg);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Control API listening on {}", addr);

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server error")?;

    Ok(())
}
