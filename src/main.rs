//! Solr-OpenSearch: serve Apache Solr search results to Salesforce Federated Search
//!
//! This is the main entry point for the application.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solr_opensearch::{
    config::{self, Settings},
    description::OpenSearchDescription,
    network::HttpClient,
    render::Templates,
    solr::parse_select_response,
    web::{create_router, AppState},
    Translator,
};
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solr-opensearch", version, about)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the OpenSearch description document
    Describe,
    /// Translate a Solr JSON select response into a feed
    Translate {
        /// Response file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Print the feed as JSON instead of Atom
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (settings, source) = config::load(cli.config.as_deref())?;

    // Initialize logging
    init_logging(settings.general.debug);
    match source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::Describe => describe(&settings),
        Command::Translate { file, json } => translate(&settings, file, json),
    }
}

/// Log to stderr so the offline commands keep stdout clean
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(settings: Settings) -> Result<()> {
    info!("Starting Solr-OpenSearch v{}", solr_opensearch::VERSION);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;

    // Create application state
    let state = AppState::new(settings.clone(), client)?;
    info!(
        "Forwarding queries to core '{}' at {} ({:?} mode)",
        settings.solr.core, settings.solr.base_url, settings.mapping.mode
    );

    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);
    info!(
        "Description document at {}/opensearch.xml",
        settings.public_url()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn describe(settings: &Settings) -> Result<()> {
    let description = OpenSearchDescription::from_settings(settings);
    let xml = Templates::new()?.render_description(&description)?;
    println!("{}", xml);
    Ok(())
}

fn translate(settings: &Settings, file: Option<PathBuf>, json: bool) -> Result<()> {
    let text = match file {
        Some(ref path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = parse_select_response(&text, &settings.mapping.fields, None)?;
    let feed = Translator::new(settings.translator_config()).translate(&result)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
    } else {
        println!("{}", Templates::new()?.render_feed(&feed)?);
    }
    Ok(())
}
