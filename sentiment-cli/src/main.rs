//! Sentiment CLI
//!
//! Runs the sentiment HTTP server, or analyzes a single text from the command line.

use std::io::IsTerminal;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sentiment_api::{ApiConfig, ApiServer, AppState};
use sentiment_core::constants::{DEFAULT_LISTEN_ADDR, NO_LIMIT};
use sentiment_core::context::RequestContext;
use sentiment_core::types::SortOrder;

/// Sentiment - sorted per-sentence sentiment scores over HTTP
#[derive(Parser)]
#[command(name = "sentiment")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, env = "SENTIMENT_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit JSON logs even on a terminal
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Pipeline overrides shared by every subcommand.
#[derive(Args, Debug, Default)]
struct ServiceArgs {
    /// Timeout for each provider call, in milliseconds
    #[arg(long, env = "SENTIMENT_REQUEST_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Cache size ceiling in MB (0 for unbounded)
    #[arg(long, env = "SENTIMENT_CACHE_MAX_SIZE_MB")]
    cache_max_size_mb: Option<usize>,

    /// Cache entry lifetime in seconds
    #[arg(long, env = "SENTIMENT_CACHE_ENTRY_TTL_SECS")]
    cache_entry_ttl_secs: Option<u64>,
}

impl ServiceArgs {
    fn apply(&self, config: &mut ApiConfig) {
        if let Some(ms) = self.timeout_ms {
            config.service.request_timeout_ms = ms;
        }
        if let Some(mb) = self.cache_max_size_mb {
            config.service.cache.max_size_mb = mb;
        }
        if let Some(secs) = self.cache_entry_ttl_secs {
            config.service.cache.entry_ttl_ms = secs.saturating_mul(1000);
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "SENTIMENT_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
        listen: SocketAddr,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Analyze one text and print the shaped response
    Analyze {
        /// Text to analyze
        text: String,

        /// Sort order: asc or desc
        #[arg(short, long, default_value = "asc")]
        order: SortOrder,

        /// Maximum number of sentences, negative for all
        #[arg(short, long, default_value_t = NO_LIMIT, allow_negative_numbers = true)]
        limit: i64,

        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.json_logs);

    match cli.command {
        Commands::Serve { listen, service } => cmd_serve(listen, &service).await,
        Commands::Analyze {
            text,
            order,
            limit,
            service,
        } => cmd_analyze(&text, order, limit, &service).await,
    }
}

/// JSON logs when asked to or when stdout is not a terminal.
fn init_logging(level: &str, force_json: bool) {
    let json = force_json || !std::io::stdout().is_terminal();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

fn load_config(service: &ServiceArgs) -> ApiConfig {
    let mut config = ApiConfig::from_env();
    service.apply(&mut config);
    config
}

/// Run the API server
async fn cmd_serve(listen: SocketAddr, service: &ServiceArgs) -> Result<()> {
    let config = load_config(service);

    if config.language.api_key.is_none() && config.language.access_token.is_none() {
        eprintln!(
            "{}",
            "Neither GOOGLE_API_KEY nor GOOGLE_ACCESS_TOKEN is set; provider calls will be rejected"
                .yellow()
        );
    }

    info!(
        request_timeout_ms = config.service.request_timeout_ms,
        cache_max_size_mb = config.service.cache.max_size_mb,
        cache_entry_ttl_ms = config.service.cache.entry_ttl_ms,
        "Starting sentiment server"
    );
    eprintln!("{}", "Starting sentiment API server...".cyan().bold());
    eprintln!("   {} http://{}", "Listening on:".green(), listen);

    let server = ApiServer::new(config).context("Failed to build server")?;
    server.run(listen).await.context("Server error")?;

    Ok(())
}

/// Analyze one text
async fn cmd_analyze(text: &str, order: SortOrder, limit: i64, service: &ServiceArgs) -> Result<()> {
    let config = load_config(service);
    let ctx = RequestContext::with_timeout(config.http_timeout());
    let state = AppState::new(config).context("Failed to build provider client")?;

    let response = state
        .service
        .handle(&ctx, text, order, limit)
        .await
        .context("Sentiment analysis failed")?;

    eprintln!(
        "{} {} sentence(s), order {}",
        "Analyzed:".green().bold(),
        response.len(),
        order
    );
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
