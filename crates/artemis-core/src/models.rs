/// A job posting discovered on a result page.
///
/// Only the identifier is populated by the scan; `description` stays empty
/// until something fills it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u64,
    pub description: String,
}

impl Job {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render as a dump line: `<id> <description>`.
    pub fn to_line(&self) -> String {
        format!("{} {}", self.id, self.description)
    }
}

/// One search facet as a query-string key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair {
    pub key: &'static str,
    pub value: String,
}

impl QueryPair {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Counters reported by a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Result pages fetched.
    pub pages: usize,
    /// Identifiers extracted, counted once per page they appeared on.
    pub ids_seen: usize,
    /// Distinct jobs held by the store when the scan ended.
    pub jobs_stored: usize,
}
