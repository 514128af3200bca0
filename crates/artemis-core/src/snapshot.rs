//! On-disk copies of every fetched listing page.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".artemis/cache";

/// Writes page HTML to timestamped files in one directory.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Create the cache, making the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AppError::ConfigError(format!(
                "Cannot create cache directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save one page verbatim and return where it went.
    pub fn save(&self, html: &str) -> Result<PathBuf, AppError> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ").to_string();
        let mut path = self.dir.join(format!("{stamp}.html"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{stamp}-{n}.html"));
            n += 1;
        }
        std::fs::write(&path, html)?;
        Ok(path)
    }
}

/// A [`Fetcher`] wrapper that snapshots every page it returns.
pub struct SnapshotFetcher<F> {
    inner: F,
    cache: SnapshotCache,
}

impl<F: Fetcher> SnapshotFetcher<F> {
    pub fn new(inner: F, cache: SnapshotCache) -> Self {
        Self { inner, cache }
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: Fetcher> Fetcher for SnapshotFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let html = self.inner.fetch(url).await?;
        let path = self.cache.save(&html)?;
        tracing::debug!(%url, path = %path.display(), bytes = html.len(), "Saved page snapshot");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockFetcher;

    #[test]
    fn creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b/c");
        let cache = SnapshotCache::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(cache.dir(), dir.as_path());
    }

    #[test]
    fn uncreatable_directory_is_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let err = SnapshotCache::new(file.join("cache")).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn save_writes_verbatim_html_to_distinct_files() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(tmp.path()).unwrap();

        let first = cache.save("<html>one</html>").unwrap();
        let second = cache.save("<html>two</html>").unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "<html>one</html>");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "<html>two</html>");
        assert_eq!(first.extension().and_then(|e| e.to_str()), Some("html"));
    }

    #[tokio::test]
    async fn fetcher_saves_each_page() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(tmp.path()).unwrap();
        let fetcher = SnapshotFetcher::new(
            MockFetcher::with_responses(vec![Ok("<p>a</p>".into()), Ok("<p>b</p>".into())]),
            cache,
        );

        assert_eq!(fetcher.fetch("http://x/1").await.unwrap(), "<p>a</p>");
        assert_eq!(fetcher.fetch("http://x/2").await.unwrap(), "<p>b</p>");

        let saved = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(saved, 2);
    }

    #[tokio::test]
    async fn fetch_errors_are_not_snapshotted() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(tmp.path()).unwrap();
        let fetcher = SnapshotFetcher::new(
            MockFetcher::with_error(AppError::Timeout(30)),
            cache,
        );

        assert!(matches!(
            fetcher.fetch("http://x/1").await,
            Err(AppError::Timeout(30))
        ));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
