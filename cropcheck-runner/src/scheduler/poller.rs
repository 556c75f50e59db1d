//! Job poller
//!
//! Drives poll rounds over the registry until every job is terminal, the run
//! is cancelled, or the optional deadline passes. Within a round the status
//! requests run concurrently; the registry is only touched after all of them
//! have returned.

use cropcheck_client::{ClientError, JobService};
use cropcheck_core::domain::job::{JobSnapshot, JobState, StatusLabel};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::output;
use crate::registry::JobRegistry;
use crate::report::{Outcome, SampleOutcome};

/// Polls outstanding jobs until they resolve
pub struct JobPoller {
    config: Config,
    service: Arc<dyn JobService>,
    semaphore: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(config: Config, service: Arc<dyn JobService>, shutdown: CancellationToken) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_parallel_polls));
        Self {
            config,
            service,
            semaphore,
            shutdown,
        }
    }

    /// Runs poll rounds until the registry drains or polling is stopped
    ///
    /// Returns one outcome per job that was in the registry on entry. Jobs
    /// still outstanding when polling stops stay in the registry and are
    /// reported as cancelled.
    pub async fn run(&self, registry: &mut JobRegistry) -> Vec<SampleOutcome> {
        info!(
            "Polling {} job(s) (interval: {:?})",
            registry.len(),
            self.config.poll_interval
        );

        let deadline = self.config.run_timeout.map(|t| Instant::now() + t);
        let mut outcomes = Vec::new();
        let mut rounds = 0u32;

        while !registry.is_empty() {
            if self.shutdown.is_cancelled() {
                info!("Polling cancelled with {} job(s) outstanding", registry.len());
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(
                    "Run timeout reached with {} job(s) outstanding",
                    registry.len()
                );
                break;
            }

            rounds += 1;
            debug!("Poll round {} over {} job(s)", rounds, registry.len());
            outcomes.extend(self.poll_round(registry).await);

            if registry.is_empty() {
                break;
            }

            let pause = match deadline {
                Some(d) => self
                    .config
                    .poll_interval
                    .min(d.saturating_duration_since(Instant::now())),
                None => self.config.poll_interval,
            };

            tokio::select! {
                _ = time::sleep(pause) => {}
                _ = self.shutdown.cancelled() => {}
            }
        }

        info!("Polling finished after {} round(s)", rounds);

        outcomes.extend(registry.jobs().map(|job| {
            SampleOutcome::new(
                job.sample.name.clone(),
                Outcome::Cancelled {
                    job_id: job.id.clone(),
                    last_state: job.state,
                },
            )
        }));
        outcomes
    }

    /// Polls every outstanding job once and applies the results
    ///
    /// Returns outcomes for the jobs that became terminal this round.
    pub async fn poll_round(&self, registry: &mut JobRegistry) -> Vec<SampleOutcome> {
        let mut join_set = JoinSet::new();

        for job_id in registry.snapshot_outstanding() {
            let service = Arc::clone(&self.service);
            let semaphore = Arc::clone(&self.semaphore);

            join_set.spawn(async move {
                // Permit is released when dropped at the end of the task
                let _permit = semaphore.acquire_owned().await;
                let result = service.poll_once(&job_id).await;
                (job_id, result)
            });
        }

        let mut polled = Vec::with_capacity(join_set.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(entry) => polled.push(entry),
                // The job stays outstanding and is polled again next round
                Err(e) => warn!("Poll task panicked: {}", e),
            }
        }

        let mut finished = Vec::new();
        for (job_id, result) in polled {
            if let Some(outcome) = self.apply(registry, &job_id, result).await {
                finished.push((job_id, outcome));
            }
        }

        finished
            .into_iter()
            .filter_map(|(job_id, outcome)| registry.remove(&job_id).map(|_| outcome))
            .collect()
    }

    /// Applies one poll result to its job, returning an outcome if the job is now terminal
    async fn apply(
        &self,
        registry: &mut JobRegistry,
        job_id: &str,
        result: Result<JobSnapshot, ClientError>,
    ) -> Option<SampleOutcome> {
        let job = registry.get_mut(job_id)?;
        let sample = job.sample.name.clone();

        let outcome = match result {
            Ok(JobSnapshot::Completed(bytes)) => {
                job.poll_failures = 0;
                let path = job.sample.output_path();
                match output::write_atomic(&path, &bytes).await {
                    Ok(()) => {
                        job.state = JobState::Completed;
                        info!("{} ({}): completed, saved {}", sample, job_id, path.display());
                        Outcome::Completed {
                            job_id: job_id.to_string(),
                            output: path,
                        }
                    }
                    Err(e) => {
                        job.state = JobState::Failed;
                        error!("{} ({}): could not save result: {:#}", sample, job_id, e);
                        Outcome::Failed {
                            job_id: job_id.to_string(),
                            reason: format!("{:#}", e),
                        }
                    }
                }
            }
            Ok(JobSnapshot::Status(StatusLabel::Unknown(raw))) => {
                // State is left as it was; the job is polled again next round
                job.poll_failures = 0;
                info!("{} ({}): unrecognised status '{}'", sample, job_id, raw);
                return None;
            }
            Ok(JobSnapshot::Status(label)) => {
                job.poll_failures = 0;
                job.state = label.state();
                if job.state != JobState::Failed {
                    info!("{} ({}): {}", sample, job_id, label);
                    return None;
                }
                error!("{} ({}): service reported failure", sample, job_id);
                Outcome::Failed {
                    job_id: job_id.to_string(),
                    reason: "service reported failure".to_string(),
                }
            }
            Err(e) if e.is_recoverable() => {
                job.poll_failures = job.poll_failures.saturating_add(1);
                match self.config.max_poll_failures {
                    Some(max) if job.poll_failures >= max => {
                        job.state = JobState::Abandoned;
                        error!(
                            "{} ({}): abandoned after {} consecutive poll failures: {}",
                            sample, job_id, job.poll_failures, e
                        );
                        Outcome::Abandoned {
                            job_id: job_id.to_string(),
                            failures: job.poll_failures,
                        }
                    }
                    _ => {
                        warn!(
                            "{} ({}): poll failed (attempt {}), retrying next round: {}",
                            sample, job_id, job.poll_failures, e
                        );
                        return None;
                    }
                }
            }
            Err(e) => {
                job.state = JobState::Failed;
                error!("{} ({}): {}", sample, job_id, e);
                Outcome::Failed {
                    job_id: job_id.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        Some(SampleOutcome::new(sample, outcome))
    }
}
