use clap::Parser;
use compile_api::ClientConfig;
use compiler_server::{create_app, run_server};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to listen on
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Base URL of the compile service (defaults to COMPILER_API_URL or wandbox.org)
    #[arg(long)]
    api_url: Option<String>,

    /// Timeout for calls to the compile service, in seconds
    #[arg(long)]
    timeout_secs: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = args.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config = config.with_timeout(Duration::try_from_secs_f64(timeout_secs)?);
    }

    let app = create_app(config)?;
    run_server(app, args.addr).await?;

    Ok(())
}
