pub mod http_fetcher;

#[cfg(feature = "browser")]
pub mod browser_session;

pub use http_fetcher::HttpFetcher;

#[cfg(feature = "browser")]
pub use browser_session::BrowserSession;
