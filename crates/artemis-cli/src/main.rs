use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use artemis_client::HttpFetcher;
use artemis_core::pacing::DEFAULT_PACING_CEILING;
use artemis_core::snapshot::DEFAULT_CACHE_DIR;
use artemis_core::{
    AppError, Environment, Feature, JobStore, PacingConfig, ScanContext, ScanController, ScanSummary,
    SearchOptions, SnapshotCache, SnapshotFetcher,
};

#[derive(Parser, Debug)]
#[command(name = "artemis", version, about = "Paginated job-search scanner")]
struct Cli {
    /// Raw, already-encoded query string; overrides every facet flag
    #[arg(long)]
    query: Option<String>,

    /// Posting age: "day", "week", or a raw time token (e.g. "r3600")
    #[arg(long)]
    time: Option<String>,

    /// City name (e.g. "berlin") or numeric geography id
    #[arg(long)]
    geo: Option<String>,

    /// Numeric geography id
    #[arg(long)]
    geo_id: Option<u64>,

    /// Search radius
    #[arg(long)]
    distance: Option<u32>,

    /// Only fair-chance employers
    #[arg(long, default_value_t = false)]
    fair_chance_employer: bool,

    /// Only jobs in your network
    #[arg(long, default_value_t = false)]
    jobs_in_your_network: bool,

    #[arg(
        long,
        env = "ARTEMIS_LOG_LEVEL",
        value_enum,
        ignore_case = true,
        default_value_t = LogLevel::Info
    )]
    log_level: LogLevel,

    /// Target site: production or development (reads ARTEMIS_ENV if not provided)
    #[arg(long)]
    env: Option<Environment>,

    /// Directory for page snapshots
    #[arg(long, env = "ARTEMIS_CACHE_DIR", default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Longest pause between page fetches, in seconds
    #[arg(long, env = "ARTEMIS_PACING_CEILING", default_value_t = DEFAULT_PACING_CEILING.as_secs())]
    pacing_ceiling: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl Cli {
    fn search_options(&self) -> SearchOptions {
        let mut options = SearchOptions::new();
        if let Some(query) = &self.query {
            options = options.with_raw_query(query);
        }
        if let Some(time) = &self.time {
            options = options.with_time(time);
        }
        if let Some(geo) = &self.geo {
            options = options.with_geo(geo);
        }
        if let Some(geo_id) = self.geo_id {
            options = options.with_geo_id(geo_id);
        }
        if let Some(distance) = self.distance {
            options = options.with_distance(distance);
        }
        if self.fair_chance_employer {
            options = options.with_feature(Feature::FairChanceEmployer);
        }
        if self.jobs_in_your_network {
            options = options.with_feature(Feature::JobsInYourNetwork);
        }
        options
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the job dump.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(cli.log_level.directive().parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cache_dir = &cli.cache_dir;
    let scan = async |ctx: &mut ScanContext, query: &str| -> Result<ScanSummary> {
        let cache = SnapshotCache::new(cache_dir)?;
        tracing::info!(cache_dir = %cache.dir().display(), "Saving page snapshots");
        match ctx.environment {
            Environment::Development => {
                let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
                let controller = ScanController::new(SnapshotFetcher::new(fetcher, cache));
                Ok(controller.run(ctx, query).await?)
            }
            Environment::Production => scan_with_browser(ctx, cache, query).await,
        }
    };

    if let Some(summary) = run(&cli, &mut std::io::stdout(), scan).await? {
        tracing::info!(
            pages = summary.pages,
            ids_seen = summary.ids_seen,
            jobs = summary.jobs_stored,
            "Done"
        );
    }
    Ok(())
}

/// Resolve the query, hand it to `scan` and print every job collected.
///
/// Returns `Ok(None)` without calling `scan` when no query was given.
async fn run<W, S>(cli: &Cli, out: &mut W, scan: S) -> Result<Option<ScanSummary>>
where
    W: Write,
    S: AsyncFnOnce(&mut ScanContext, &str) -> Result<ScanSummary>,
{
    let Some(query) = cli
        .search_options()
        .query_string()
        .context("Invalid search options")?
    else {
        tracing::error!("No query given: pass --query or at least one facet flag");
        return Ok(None);
    };

    let environment = match cli.env {
        Some(env) => env,
        None => Environment::from_env()?,
    };
    let pacing = PacingConfig::new(Duration::from_secs(cli.pacing_ceiling));
    let mut ctx = ScanContext::new(environment, pacing);
    tracing::info!(%environment, "Configured scan");

    let result = scan(&mut ctx, &query).await;

    // Whatever was collected before a failure is still printed.
    dump(&ctx.store, out)?;

    match result {
        Ok(summary) => Ok(Some(summary)),
        Err(e) => {
            let transient = e.downcast_ref::<AppError>().is_some_and(AppError::is_transient);
            tracing::warn!(transient, jobs = ctx.store.len(), "Scan stopped early");
            Err(e.context("Scan aborted"))
        }
    }
}

fn dump(store: &JobStore, out: &mut impl Write) -> std::io::Result<()> {
    for job in store.dump() {
        writeln!(out, "{}", job.to_line())?;
    }
    out.flush()
}

#[cfg(feature = "browser")]
async fn scan_with_browser(
    ctx: &mut ScanContext,
    cache: SnapshotCache,
    query: &str,
) -> Result<ScanSummary> {
    use artemis_client::BrowserSession;
    use artemis_core::Credentials;

    let credentials = Credentials::from_env()?;
    let session = BrowserSession::launch()
        .await
        .context("Failed to start browser session")?;
    session
        .login(&credentials, &ctx.environment.urls())
        .await
        .context("Login failed")?;

    let controller = ScanController::new(SnapshotFetcher::new(session, cache));
    let result = controller.run(ctx, query).await;
    let closed = controller.into_fetcher().into_inner().close().await;

    after_close(result, closed)
}

/// The scan's own outcome wins; a failed browser shutdown is only logged.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn after_close(
    result: Result<ScanSummary, AppError>,
    closed: Result<(), AppError>,
) -> Result<ScanSummary> {
    if let Err(e) = closed {
        tracing::warn!(error = %e, "Failed to close browser");
    }
    Ok(result?)
}

#[cfg(not(feature = "browser"))]
async fn scan_with_browser(
    _ctx: &mut ScanContext,
    _cache: SnapshotCache,
    _query: &str,
) -> Result<ScanSummary> {
    anyhow::bail!("The production target needs a browser; rebuild with `--features browser`")
}
