//! Test utilities: mock implementations of the core traits.
//!
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::traits::{Fetcher, PageProbe};
use crate::wait::PageState;

/// Render a minimal listing page linking to the given job ids.
pub fn listing_page(ids: &[u64]) -> String {
    let items: String = ids
        .iter()
        .map(|id| format!(r#"<li><a href="/jobs/view/{id}/?trk=public_jobs">Job {id}</a></li>"#))
        .collect();
    format!(r#"<html><body><ul class="jobs-search__results-list">{items}</ul></body></html>"#)
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that replays a queue of responses and records every URL.
#[derive(Clone)]
pub struct MockFetcher {
    /// Each call pops the first element. If empty, returns a page with no jobs.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs fetched so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockProbe
// ---------------------------------------------------------------------------

/// Mock page probe that steps through a list of states.
///
/// The last state repeats once the list is exhausted.
#[derive(Clone)]
pub struct MockProbe {
    states: Arc<Mutex<Vec<Result<PageState, AppError>>>>,
    last: Arc<Mutex<PageState>>,
    polls: Arc<Mutex<usize>>,
}

impl MockProbe {
    pub fn with_states(states: Vec<PageState>) -> Self {
        Self {
            states: Arc::new(Mutex::new(states.into_iter().map(Ok).collect())),
            last: Arc::new(Mutex::new(PageState::default())),
            polls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            states: Arc::new(Mutex::new(vec![Err(error)])),
            last: Arc::new(Mutex::new(PageState::default())),
            polls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn polls(&self) -> usize {
        *self.polls.lock().unwrap()
    }
}

impl PageProbe for MockProbe {
    async fn state(&self) -> Result<PageState, AppError> {
        *self.polls.lock().unwrap() += 1;
        let mut states = self.states.lock().unwrap();
        if states.is_empty() {
            return Ok(self.last.lock().unwrap().clone());
        }
        let next = states.remove(0)?;
        *self.last.lock().unwrap() = next.clone();
        Ok(next)
    }
}
