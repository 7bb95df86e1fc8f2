//! rustscholar - Google Scholar journal article scraper
//!
//! Scrapes Google Scholar result pages, keeps journal articles only and
//! enriches each with keywords from its PDF or, failing that, its title.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! rustscholar search "graph neural networks" --pages 3 --output-dir ./output
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! rustscholar serve --port 3000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use clap::{Parser, Subcommand};
use rustscholar::sink::{self, OutputFormat, RecordSink};
use rustscholar::{
    CancelFlag, EnrichedRecord, HttpFetcher, KeyTermExtractor, PdfReader, ScrapeConfig, Scraper,
    SearchQuery,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

type HttpScraper = Scraper<HttpFetcher, KeyTermExtractor, PdfReader>;

// ============================================================================
// CLI Definition
// ============================================================================

/// Google Scholar journal article scraper with keyword enrichment
#[derive(Parser)]
#[command(name = "rustscholar")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape journal articles for a query and save them
    Search {
        /// Keywords or article title
        query: String,

        /// Number of result pages to scrape
        #[arg(short, long, default_value = "1")]
        pages: String,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "csv", value_parser = ["csv", "json"])]
        format: String,

        /// Keywords kept per article
        #[arg(long, default_value = "5")]
        top_n: usize,

        /// Pause after each page fetch, in seconds
        #[arg(long, default_value = "2")]
        delay_secs: u64,

        /// Articles enriched in parallel within a page
        #[arg(long, default_value = "3")]
        concurrency: usize,

        /// Proxy URL (e.g., http://127.0.0.1:7890)
        #[arg(long)]
        proxy: Option<String>,

        /// Mirror site URL
        #[arg(long)]
        mirror: Option<String>,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Proxy URL used for outgoing requests
        #[arg(long)]
        proxy: Option<String>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.json_logs);

    match cli.command {
        Commands::Search {
            query,
            pages,
            output_dir,
            format,
            top_n,
            delay_secs,
            concurrency,
            proxy,
            mirror,
        } => {
            let mut config = ScrapeConfig {
                top_n,
                page_delay: Duration::from_secs(delay_secs),
                enrich_concurrency: concurrency,
                proxy,
                ..Default::default()
            };
            if let Some(mirror) = mirror {
                config.base_url = mirror;
            }
            let format = match format.as_str() {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Csv,
            };
            run_search(&query, &pages, output_dir, format, config).await
        }
        Commands::Serve { port, host, proxy } => run_server(host, port, proxy).await,
    }
}

fn init_logging(debug: bool, json: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Construct the scraper and its shared components.
fn build_scraper(config: ScrapeConfig) -> Result<HttpScraper> {
    let fetcher = HttpFetcher::new(config.proxy.as_deref())?;
    let model = KeyTermExtractor::new()?;
    let scraper = Scraper::new(
        config,
        Arc::new(fetcher),
        Arc::new(model),
        Arc::new(PdfReader::default()),
    )?;
    Ok(scraper)
}

// ============================================================================
// Search Command
// ============================================================================

async fn run_search(
    query_text: &str,
    pages: &str,
    output_dir: Option<PathBuf>,
    format: OutputFormat,
    config: ScrapeConfig,
) -> Result<()> {
    let query = SearchQuery::parse(query_text, pages).context("Invalid --pages value")?;

    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir).context("Failed to create output directory")?;
    }
    let output_path = sink::default_output_path(output_dir.as_deref(), format);

    let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
    let scraper = build_scraper(config)?.with_cancel_flag(Arc::clone(&cancel));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping before the next page");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    println!("Scraping in progress, please wait...");
    let records = scraper.run(&query).await?;

    let written = sink::sink_for(format, output_path.clone())
        .write(&records)
        .context("Failed to save records")?;

    println!(
        "Done! Saved {} journal articles to {}",
        written,
        output_path.display()
    );
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

struct AppState {
    scraper: HttpScraper,
}

async fn run_server(host: String, port: u16, proxy: Option<String>) -> Result<()> {
    info!(host = %host, port = port, "Starting HTTP server");

    let config = ScrapeConfig {
        proxy,
        ..Default::default()
    };
    let app_state = Arc::new(AppState {
        scraper: build_scraper(config)?,
    });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/search", post(search_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Search request body
#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_pages")]
    pages: u32,
}

fn default_pages() -> u32 {
    1
}

/// Search response
#[derive(Debug, Serialize)]
struct SearchResponse {
    status: String,
    count: usize,
    records: Vec<EnrichedRecord>,
}

/// Search endpoint handler
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    info!(query = %req.query, pages = req.pages, "Search request");

    let query = SearchQuery::new(req.query, req.pages);
    match state.scraper.run(&query).await {
        Ok(records) => Json(SearchResponse {
            status: "success".to_string(),
            count: records.len(),
            records,
        }),
        Err(e) => {
            error!(error = %e, "Search failed");
            Json(SearchResponse {
                status: format!("error: {}", e),
                count: 0,
                records: vec![],
            })
        }
    }
}
