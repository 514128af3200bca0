use indexmap::IndexMap;

use crate::error::AppError;
use crate::models::Job;

/// In-memory jobs keyed by identifier, kept in first-insertion order.
///
/// Re-inserting an id replaces the record in place.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: IndexMap<u64, Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: u64, job: Job) {
        self.jobs.insert(id, job);
    }

    pub fn get(&self, id: u64) -> Result<&Job, AppError> {
        self.jobs.get(&id).ok_or(AppError::NotFound(id))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.jobs.contains_key(&id)
    }

    pub fn dump(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
