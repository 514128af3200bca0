use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::AppError;
use crate::traits::Fetcher;

/// Results per listing page.
pub const PAGE_SIZE: usize = 15;
/// Exclusive upper bound on the `start` offset.
pub const MAX_OFFSET: usize = 200;
/// Path segment that marks a job-view link.
pub const JOB_VIEW_SEGMENT: &str = "/jobs/view/";
/// CSS selector for anchors that point at a job-view page.
pub const JOB_LINK_SELECTOR: &str = r#"a[href*="/jobs/view/"]"#;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

static JOB_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{}\D*(\d+)", regex::escape(JOB_VIEW_SEGMENT))).expect("static regex")
});

/// Every `start` offset of a scan: 0, 15, ..., 195.
pub fn page_offsets() -> impl Iterator<Item = usize> {
    (0..MAX_OFFSET).step_by(PAGE_SIZE)
}

/// Listing URL for one page of a query.
pub fn page_url(search_url: &str, query: &str, offset: usize) -> String {
    format!("{search_url}?{query}&start={offset}")
}

/// Pull the job id out of a single link target, if it is a job-view link.
pub fn job_id_from_href(href: &str) -> Option<u64> {
    JOB_ID_PATTERN
        .captures(href)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Collect the distinct job ids linked from a listing page.
pub fn extract_job_ids(html: &str) -> HashSet<u64> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(job_id_from_href)
        .collect()
}

/// Fetches listing pages for one query and extracts their job ids.
pub struct PageScanner<'a, F: Fetcher> {
    fetcher: &'a F,
    search_url: &'a str,
}

impl<'a, F: Fetcher> PageScanner<'a, F> {
    pub fn new(fetcher: &'a F, search_url: &'a str) -> Self {
        Self {
            fetcher,
            search_url,
        }
    }

    pub async fn scan_page(&self, query: &str, offset: usize) -> Result<HashSet<u64>, AppError> {
        let url = page_url(self.search_url, query, offset);
        tracing::debug!(%url, "Fetching listing page");
        let html = self.fetcher.fetch(&url).await?;
        Ok(extract_job_ids(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockFetcher, listing_page};

    const SAMPLE_PAGE: &str = r#"
        <html><body>
          <ul class="jobs-search__results-list">
            <li><a href="https://www.linkedin.com/jobs/view/123/?refId=abc">Rust dev</a></li>
            <li><a href="/jobs/view/456">Go dev</a></li>
            <li><a href="/jobs/view/789?trk=public_jobs">Zig dev</a></li>
            <li><a class="logo" href="/jobs/view/789">Zig dev (logo)</a></li>
            <li><a href="/company/42">Some company</a></li>
            <li><a name="no-href">anchor</a></li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn test_offsets_cover_fixed_range() {
        let offsets: Vec<usize> = page_offsets().collect();
        assert_eq!(offsets.len(), 14);
        assert_eq!(offsets.first(), Some(&0));
        assert_eq!(offsets.last(), Some(&195));
        assert!(offsets.windows(2).all(|w| w[1] - w[0] == PAGE_SIZE));
    }

    #[test]
    fn test_page_url_appends_start() {
        assert_eq!(
            page_url("https://example.com/jobs/search/", "keywords=rust", 30),
            "https://example.com/jobs/search/?keywords=rust&start=30"
        );
    }

    #[test]
    fn test_extract_collapses_duplicates() {
        let ids = extract_job_ids(SAMPLE_PAGE);
        assert_eq!(ids, HashSet::from([123, 456, 789]));
    }

    #[test]
    fn test_job_id_from_href() {
        assert_eq!(job_id_from_href("/jobs/view/3812345678/"), Some(3812345678));
        assert_eq!(
            job_id_from_href("/jobs/view/senior-rust-engineer-at-acme-3812345678"),
            Some(3812345678)
        );
        assert_eq!(job_id_from_href("/jobs/search/?start=15"), None);
        assert_eq!(job_id_from_href("/jobs/view/"), None);
    }

    #[test]
    fn test_job_link_selector_matches_listing() {
        use crate::wait::{PageState, WaitCondition};

        let cond = WaitCondition::SelectorExists(JOB_LINK_SELECTOR.into());
        assert!(cond.matches(&PageState::new("", SAMPLE_PAGE)));
        assert!(!cond.matches(&PageState::new("", "<a href=\"/company/1\">x</a>")));
    }

    #[test]
    fn test_extract_empty_page() {
        assert!(extract_job_ids("<html><body></body></html>").is_empty());
    }

    #[tokio::test]
    async fn test_scan_page_requests_offset_url() {
        let fetcher = MockFetcher::new(&listing_page(&[5, 6]));
        let scanner = PageScanner::new(&fetcher, "http://localhost:8000/jobs/search/");

        let ids = scanner.scan_page("keywords=rust", 15).await.unwrap();

        assert_eq!(ids, HashSet::from([5, 6]));
        assert_eq!(
            fetcher.requested(),
            vec!["http://localhost:8000/jobs/search/?keywords=rust&start=15".to_string()]
        );
    }

    #[tokio::test]
    async fn test_scan_page_propagates_fetch_error() {
        let fetcher = MockFetcher::with_error(AppError::HttpError("HTTP 500".into()));
        let scanner = PageScanner::new(&fetcher, "http://localhost:8000/jobs/search/");

        let err = scanner.scan_page("q=1", 0).await.unwrap_err();
        assert!(matches!(err, AppError::HttpError(_)));
    }
}
