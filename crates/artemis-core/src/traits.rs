use std::future::Future;

use crate::error::AppError;
use crate::wait::PageState;

/// Fetches the rendered HTML of a listing page.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Reads the current state of a live page so wait conditions can be polled.
pub trait PageProbe: Send + Sync {
    fn state(&self) -> impl Future<Output = Result<PageState, AppError>> + Send;
}
