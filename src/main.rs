//! docport CLI: serve the document management web interface.

use clap::{Parser, Subcommand};

use docport::config::Settings;
use docport::server;

#[derive(Parser)]
#[command(name = "docport", version, about = "Document management web front end")]
struct Cli {
    /// Backend API endpoint.
    #[arg(long, global = true, env = "DOCPORT_API_ENDPOINT")]
    api_endpoint: Option<String>,

    /// Data directory for draft and staged-file storage.
    #[arg(long, global = true, env = "DOCPORT_DATA_DIR")]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web interface.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.data_dir {
        Some(ref dir) => Settings::with_data_dir(dir),
        None => Settings::default(),
    };
    if let Some(endpoint) = cli.api_endpoint {
        settings.api_endpoint = endpoint;
    }

    match cli.command {
        Commands::Serve { host, port } => server::serve(&settings, &host, port).await,
    }
}
