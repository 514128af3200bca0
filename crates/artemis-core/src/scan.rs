use crate::config::Environment;
use crate::error::AppError;
use crate::models::{Job, ScanSummary};
use crate::pacing::PacingConfig;
use crate::scanner::{PageScanner, page_offsets};
use crate::store::JobStore;
use crate::traits::Fetcher;

/// Everything a run shares: the selected site, pacing and collected jobs.
///
/// Built once at startup and handed to the controller by reference.
#[derive(Debug, Default)]
pub struct ScanContext {
    pub environment: Environment,
    pub pacing: PacingConfig,
    pub store: JobStore,
}

impl ScanContext {
    pub fn new(environment: Environment, pacing: PacingConfig) -> Self {
        Self {
            environment,
            pacing,
            store: JobStore::new(),
        }
    }
}

/// Walks every listing page of a query and records the jobs found.
///
/// Pages are fetched strictly one after another with a pacing pause in
/// between. The whole offset range is always walked; there is no
/// end-of-results detection.
pub struct ScanController<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> ScanController<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    /// Scan all pages of `query`, inserting each discovered id into `ctx.store`.
    ///
    /// A fetch error ends the scan; jobs stored before it stay in the store.
    pub async fn run(&self, ctx: &mut ScanContext, query: &str) -> Result<ScanSummary, AppError> {
        let urls = ctx.environment.urls();
        let scanner = PageScanner::new(&self.fetcher, urls.search_url);
        let mut summary = ScanSummary::default();

        tracing::info!(%query, environment = %ctx.environment, "Starting scan");

        let mut offsets = page_offsets().peekable();
        while let Some(offset) = offsets.next() {
            let ids = scanner.scan_page(query, offset).await?;

            let new = ids.iter().filter(|id| !ctx.store.contains(**id)).count();
            for id in &ids {
                ctx.store.set(*id, Job::new(*id));
            }

            summary.pages += 1;
            summary.ids_seen += ids.len();
            tracing::info!(offset, found = ids.len(), new, "Scanned page");

            if offsets.peek().is_some() {
                ctx.pacing.pause().await;
            }
        }

        summary.jobs_stored = ctx.store.len();
        tracing::info!(
            pages = summary.pages,
            jobs = summary.jobs_stored,
            "Scan complete"
        );
        Ok(summary)
    }
}
