use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex_search::{
    config::Config,
    sources::{CatalogClient, InMemoryCatalog, PokeApiClient},
    web::{AppState, WebServer},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Parser)]
#[command(name = "pokedex-search")]
#[command(version)]
#[command(about = "Paginated, filterable Pokédex search service")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Catalog base URL (overrides config file)
    #[arg(long, value_name = "URL")]
    catalog_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Serve the built-in sample catalog instead of calling the remote API
    #[arg(long)]
    offline: bool,
}

fn init_logging(level: &str, format: LogFormat) {
    let log_filter = if level == "trace" {
        format!("pokedex_search={level},tower_http=trace")
    } else {
        format!("pokedex_search={level}")
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    info!("Starting Pokédex search v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(catalog_url) = cli.catalog_url {
        config.catalog.base_url = catalog_url;
    }
    config.validate()?;

    let client: Arc<dyn CatalogClient> = if cli.offline {
        warn!("Offline mode: serving the built-in sample catalog");
        Arc::new(InMemoryCatalog::sample())
    } else {
        info!("Using catalog: {}", config.catalog.base_url);
        Arc::new(PokeApiClient::new(
            &config.catalog,
            config.query.max_detail_concurrency,
        )?)
    };

    info!(
        "Cache TTLs: types={}, names={}, type pools={}, lite={}, details={}, listings={}",
        humantime::format_duration(config.cache.types_ttl),
        humantime::format_duration(config.cache.all_names_ttl),
        humantime::format_duration(config.cache.type_pool_ttl),
        humantime::format_duration(config.cache.lite_by_name_ttl),
        humantime::format_duration(config.cache.details_ttl),
        humantime::format_duration(config.cache.listing_ttl),
    );

    let state = AppState::new(&config, client);
    let server = WebServer::new(&config.web, state)?;
    server.serve().await
}
