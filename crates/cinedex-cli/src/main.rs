//! cinedex - movie search and detail browser CLI.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cinedex_api::omdb::{OmdbClient, TypeFilter};
use cinedex_api::probe::HttpImageProbe;
use cinedex_proxy::ProxyState;
use cinedex_search::{DetailState, RESULTS_PER_PAGE, SearchSession, load_details};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio::net::TcpListener;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};

/// User-Agent sent with every outbound request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// OMDb API key. Without it requests go through the cinedex proxy.
    #[arg(long, global = true, env = "OMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search titles and print one page of results.
    Search(SearchArgs),
    /// Show a single title.
    Details(DetailsArgs),
    /// Browse search results interactively via TUI.
    Browse,
    /// Run the HTTP proxy that holds the API key.
    Serve(ServeArgs),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search text (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Page number, clamped to the available pages.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Media type filter: all, movie, series or episode.
    #[arg(long = "type", default_value = "all")]
    type_filter: TypeFilter,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb ID (e.g. "tt0372784").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `serve` subcommand.
#[derive(clap::Args)]
struct ServeArgs {
    /// Listen address (host:port). Falls back to `proxy.bind` in config.toml.
    #[arg(long)]
    bind: Option<String>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Returns the API key if it is set and not blank.
fn api_key(cli_key: Option<&str>) -> Option<&str> {
    cli_key.map(str::trim).filter(|k| !k.is_empty())
}

/// Builds the directory client from config and the API key.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to build.
fn build_client(key: Option<&str>, dir: Option<&PathBuf>) -> Result<OmdbClient> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let mut builder = OmdbClient::builder().user_agent(USER_AGENT);
    if let Some(url) = config.directory_url(key.is_some())? {
        tracing::debug!(%url, "using directory endpoint override");
        builder = builder.base_url(url);
    }
    if let Some(key) = key {
        builder = builder.api_key(key);
    }
    let client = builder.build().context("failed to build API client")?;
    if !client.is_direct() {
        tracing::debug!("OMDB_API_KEY is not set, using the cinedex proxy");
    }
    Ok(client)
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, client: OmdbClient) -> Result<()> {
    let session = SearchSession::new(Arc::new(client));
    session.change_filter(args.type_filter).await;
    session.open_page(&args.query, args.page).await;

    let view = session.view();
    if let Some(error) = view.error {
        bail!("{error}");
    }
    if view.results.is_empty() {
        bail!("search text must not be blank");
    }

    tracing::info!("ID\t\tYear\tType\tTitle");
    for record in &view.results {
        let s = &record.summary;
        tracing::info!("{}\t{}\t{}\t{}", s.id, s.year, s.media_type, s.title);
        if !record.plot.is_empty() {
            tracing::info!("\t\t{}", record.plot);
        }
    }
    tracing::info!(
        "Page {}/{} ({} per page)",
        view.meta.current_page,
        view.meta.total_pages,
        RESULTS_PER_PAGE
    );

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails or the title is unknown.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, client: OmdbClient) -> Result<()> {
    let probe = HttpImageProbe::new(USER_AGENT)?;

    let (details, poster) = match load_details(&client, &probe, args.id.trim()).await {
        DetailState::Loaded { details, poster } => (details, poster),
        DetailState::Failed(message) => bail!("{message}"),
        DetailState::Loading => bail!("lookup did not finish"),
    };

    tracing::info!("{} ({})", details.title, details.year);
    tracing::info!("ID:       {}", details.id);
    tracing::info!("Type:     {}", details.media_type);
    tracing::info!("Genre:    {}", details.genre);
    if let Some(ref director) = details.director {
        tracing::info!("Director: {director}");
    }
    if let Some(ref runtime) = details.runtime {
        tracing::info!("Runtime:  {runtime}");
    }
    tracing::info!("Actors:   {}", details.actors);
    tracing::info!("Poster:   {poster}");
    tracing::info!("Plot:     {}", details.plot);
    for rating in &details.ratings {
        tracing::info!("Rating:   {} {}", rating.source, rating.value);
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the probe fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(client: OmdbClient) -> Result<()> {
    let probe = Arc::new(HttpImageProbe::new(USER_AGENT)?);
    let session = SearchSession::new(Arc::new(client));
    tui::run_browser(session, probe)
        .await
        .context("browser TUI failed")
}

/// Runs the `serve` subcommand.
///
/// # Errors
///
/// Returns an error if no API key is set, the address cannot be bound, or
/// the server fails.
#[instrument(skip_all)]
async fn run_serve(args: &ServeArgs, key: Option<&str>, dir: Option<&PathBuf>) -> Result<()> {
    let Some(key) = key else {
        bail!("OMDB_API_KEY must be set to run the proxy");
    };
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let client = build_client(Some(key), dir)?;
    let bind = args.bind.as_deref().unwrap_or(&config.proxy.bind);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    cinedex_proxy::serve(listener, ProxyState::new(client)?).await
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let key = api_key(cli.api_key.as_deref());
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Search(ref args) => run_search(args, build_client(key, dir)?).await,
        Commands::Details(ref args) => run_details(args, build_client(key, dir)?).await,
        Commands::Browse => run_browse(build_client(key, dir)?).await,
        Commands::Serve(ref args) => run_serve(args, key, dir).await,
        Commands::Completions(ref args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
