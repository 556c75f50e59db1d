//! Job registry
//!
//! In-memory map of outstanding jobs. The poller owns it mutably and is the
//! only writer, so no locking is needed. A second index by sample name keeps
//! at most one in-flight job per sample.

use anyhow::Result;
use cropcheck_core::domain::job::Job;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: HashMap<String, Job>,
    by_sample: HashMap<String, String>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a freshly submitted job
    ///
    /// Fails if the id is already tracked or the sample already has a job in flight.
    pub fn add(&mut self, job: Job) -> Result<()> {
        if self.jobs.contains_key(&job.id) {
            anyhow::bail!("job {} is already registered", job.id);
        }
        if let Some(existing) = self.by_sample.get(&job.sample.name) {
            anyhow::bail!(
                "sample {} already has job {} in flight",
                job.sample.name,
                existing
            );
        }

        self.by_sample.insert(job.sample.name.clone(), job.id.clone());
        self.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Stops tracking a job, returning it if it was present
    pub fn remove(&mut self, job_id: &str) -> Option<Job> {
        let job = self.jobs.remove(job_id)?;
        self.by_sample.remove(&job.sample.name);
        Some(job)
    }

    /// Point-in-time copy of the outstanding ids, sorted for stable iteration
    pub fn snapshot_outstanding(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn get(&self, job_id: &str) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    pub fn get_mut(&mut self, job_id: &str) -> Option<&mut Job> {
        self.jobs.get_mut(job_id)
    }

    pub fn contains_sample(&self, sample: &str) -> bool {
        self.by_sample.contains_key(sample)
    }

    /// Job currently in flight for `sample`, if any
    pub fn job_for_sample(&self, sample: &str) -> Option<&Job> {
        self.by_sample.get(sample).and_then(|id| self.jobs.get(id))
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
