use anyhow::Result;
use axum::Router;
use clap::Parser;
use newsscope_core::ExplorerConfig;
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// News dataset (CSV with headlines, content, category, url columns)
    #[arg(long, default_value = "./indian_express_news_dataset.csv")]
    dataset: PathBuf,
    /// JSON file with topic-model settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed seed for reproducible topics
    #[arg(long)]
    seed: Option<u64>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::from_json_file(path)?,
        None => ExplorerConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let app: Router = build_app(args.dataset.clone(), config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
