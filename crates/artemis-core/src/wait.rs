//! Polling predicates over a live page.
//!
//! A [`WaitCondition`] is a pure check against a [`PageState`] snapshot.
//! [`poll_until`] re-reads the page through a [`PageProbe`] until the
//! condition holds or the timeout expires.

use std::time::Duration;

use scraper::{Html, Selector};
use tokio::time::Instant;

use crate::error::AppError;
use crate::traits::PageProbe;

/// What the page looked like at one poll.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub url: String,
    pub html: String,
}

impl PageState {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// Current URL starts with the prefix.
    UrlPrefix(String),
    /// Some element matching `selector` carries `class` in its class list.
    AttributeClass { selector: String, class: String },
    /// At least one element matches.
    SelectorExists(String),
    /// Exactly `count` elements match.
    SelectorCountEquals { selector: String, count: usize },
}

impl WaitCondition {
    /// An unparsable selector never matches.
    pub fn matches(&self, state: &PageState) -> bool {
        match self {
            WaitCondition::UrlPrefix(prefix) => state.url.starts_with(prefix.as_str()),
            WaitCondition::AttributeClass { selector, class } => {
                with_selector(selector, &state.html, |doc, sel| {
                    doc.select(sel)
                        .any(|el| el.value().classes().any(|c| c == class.as_str()))
                })
            }
            WaitCondition::SelectorExists(selector) => {
                with_selector(selector, &state.html, |doc, sel| {
                    doc.select(sel).next().is_some()
                })
            }
            WaitCondition::SelectorCountEquals { selector, count } => {
                with_selector(selector, &state.html, |doc, sel| {
                    doc.select(sel).count() == *count
                })
            }
        }
    }
}

fn with_selector(selector: &str, html: &str, check: impl FnOnce(&Html, &Selector) -> bool) -> bool {
    match Selector::parse(selector) {
        Ok(sel) => check(&Html::parse_document(html), &sel),
        Err(e) => {
            tracing::warn!(%selector, error = %e, "Ignoring unparsable wait selector");
            false
        }
    }
}

/// Poll `probe` every `interval` until `condition` holds.
///
/// Returns [`AppError::Timeout`] once `timeout` has elapsed without a match.
pub async fn poll_until<P: PageProbe>(
    probe: &P,
    condition: &WaitCondition,
    timeout: Duration,
    interval: Duration,
) -> Result<(), AppError> {
    let deadline = Instant::now() + timeout;
    loop {
        let state = probe.state().await?;
        if condition.matches(&state) {
            return Ok(());
        }
        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(?condition, "Wait condition not met before timeout");
            return Err(AppError::timeout(timeout));
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}
