pub mod config;
pub mod error;
pub mod models;
pub mod pacing;
pub mod query;
pub mod scan;
pub mod scanner;
pub mod snapshot;
pub mod store;
pub mod traits;
pub mod wait;

#[cfg(test)]
pub mod testutil;

pub use config::{Credentials, Environment, SiteUrls};
pub use error::AppError;
pub use models::{Job, QueryPair, ScanSummary};
pub use pacing::PacingConfig;
pub use query::{Feature, SearchOptions};
pub use scan::{ScanContext, ScanController};
pub use snapshot::{SnapshotCache, SnapshotFetcher};
pub use store::JobStore;
pub use traits::{Fetcher, PageProbe};
pub use wait::{PageState, WaitCondition, poll_until};
