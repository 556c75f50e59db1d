//! Run driver
//!
//! Enumerates sample folders, builds and submits a job for each, then hands
//! the registry to the poller. Per-sample problems are logged and reported;
//! only problems with the samples root abort the run.

use anyhow::{Context, Result};
use chrono::Utc;
use cropcheck_client::JobService;
use cropcheck_core::domain::job::Job;
use cropcheck_core::domain::sample::Sample;
use cropcheck_core::{ProtocolVersion, build};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::output;
use crate::registry::JobRegistry;
use crate::report::{Outcome, RunReport, SampleOutcome};
use crate::scheduler::JobPoller;

/// Lists the sample folders directly under `root`, sorted by name
pub fn discover_samples(root: &Path) -> Result<Vec<Sample>> {
    if !root.is_dir() {
        anyhow::bail!("Sample directory not found: {}", root.display());
    }

    let mut samples = Vec::new();
    for entry in std::fs::read_dir(root)
        .with_context(|| format!("Failed to list {}", root.display()))?
    {
        let entry = entry.with_context(|| format!("Failed to list {}", root.display()))?;
        // Follows symlinks so linked sample folders are picked up
        if entry.path().is_dir() {
            samples.push(Sample::from_dir(entry.path()));
        }
    }

    samples.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(samples)
}

/// Builds and submits one job per sample, registering each accepted job
///
/// Stops submitting once `shutdown` fires; samples not yet submitted are
/// reported as skipped. Returns outcomes for the samples that were skipped.
pub async fn submit_samples(
    samples: &[Sample],
    version: ProtocolVersion,
    service: &dyn JobService,
    registry: &mut JobRegistry,
    shutdown: &CancellationToken,
) -> Vec<SampleOutcome> {
    let mut skipped = Vec::new();

    for (index, sample) in samples.iter().enumerate() {
        if shutdown.is_cancelled() {
            let remaining = &samples[index..];
            info!(
                "Interrupted, leaving {} sample(s) unsubmitted",
                remaining.len()
            );
            skipped.extend(remaining.iter().map(|s| {
                SampleOutcome::new(
                    s.name.clone(),
                    Outcome::Skipped {
                        reason: "interrupted before submission".to_string(),
                    },
                )
            }));
            break;
        }

        if let Some(job) = registry.job_for_sample(&sample.name) {
            warn!("{}: job {} already in flight, not resubmitting", sample, job.id);
            continue;
        }

        match output::remove_stale(&sample.output_path()) {
            Ok(true) => info!("{}: deleted old {}", sample, sample.output_path().display()),
            Ok(false) => {}
            Err(e) => warn!("{}: {:#}", sample, e),
        }

        let request = match build(sample, version) {
            Ok(request) => request,
            Err(e) => {
                warn!("Skipping {}", e);
                skipped.push(SampleOutcome::new(
                    sample.name.clone(),
                    Outcome::Skipped {
                        reason: e.to_string(),
                    },
                ));
                continue;
            }
        };

        let job_id = match service.submit(&request).await {
            Ok(job_id) => job_id,
            Err(e) => {
                error!("{}: submission failed: {}", sample, e);
                skipped.push(SampleOutcome::new(
                    sample.name.clone(),
                    Outcome::Skipped {
                        reason: e.to_string(),
                    },
                ));
                continue;
            }
        };

        info!("Submitted {}: job {}", sample, job_id);
        if let Err(e) = registry.add(Job::new(job_id, sample.clone())) {
            error!("{}: {:#}", sample, e);
            skipped.push(SampleOutcome::new(
                sample.name.clone(),
                Outcome::Skipped {
                    reason: e.to_string(),
                },
            ));
        }
    }

    skipped
}

/// Runs the whole submit-then-poll cycle over every sample under the configured root
pub async fn run(
    config: &Config,
    service: Arc<dyn JobService>,
    shutdown: CancellationToken,
) -> Result<RunReport> {
    let started_at = Utc::now();
    let samples = discover_samples(&config.samples_root)?;

    if samples.is_empty() {
        info!("No sample folders found in {}", config.samples_root.display());
        return Ok(RunReport::new(started_at, Vec::new()));
    }

    info!(
        "Found {} sample(s), submitting with API {}",
        samples.len(),
        config.protocol
    );

    let mut registry = JobRegistry::new();
    let mut outcomes = submit_samples(
        &samples,
        config.protocol,
        service.as_ref(),
        &mut registry,
        &shutdown,
    )
    .await;

    if !registry.is_empty() {
        let poller = JobPoller::new(config.clone(), service, shutdown);
        outcomes.extend(poller.run(&mut registry).await);
    }

    Ok(RunReport::new(started_at, outcomes))
}
