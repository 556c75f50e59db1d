//! Run report
//!
//! Collects one outcome per sample and renders the end-of-run summary.

use chrono::{DateTime, Utc};
use colored::*;
use cropcheck_core::domain::job::JobState;
use std::path::PathBuf;

/// How a single sample ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Result written to `output`
    Completed { job_id: String, output: PathBuf },
    /// Service reported failure, or the result could not be read or stored
    Failed { job_id: String, reason: String },
    /// Gave up after too many consecutive poll failures
    Abandoned { job_id: String, failures: u32 },
    /// Still outstanding when polling stopped
    Cancelled { job_id: String, last_state: JobState },
    /// Never entered the registry
    Skipped { reason: String },
}

/// Outcome for a named sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOutcome {
    pub sample: String,
    pub outcome: Outcome,
}

impl SampleOutcome {
    pub fn new(sample: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            sample: sample.into(),
            outcome,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Outcome::Completed { .. })
    }
}

/// Summary of an entire run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SampleOutcome>,
}

impl RunReport {
    /// Builds a report, ordering outcomes by sample name
    pub fn new(started_at: DateTime<Utc>, mut outcomes: Vec<SampleOutcome>) -> Self {
        outcomes.sort_by(|a, b| a.sample.cmp(&b.sample));
        Self {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        }
    }

    pub fn outcome_for(&self, sample: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.sample == sample)
            .map(|o| &o.outcome)
    }

    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    /// True when every sample produced a result
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(SampleOutcome::is_completed)
    }

    /// Prints the colored per-sample summary to stdout
    pub fn print(&self) {
        if self.outcomes.is_empty() {
            println!("{}", "No sample folders found.".yellow());
            return;
        }

        let seconds = self
            .finished_at
            .signed_duration_since(self.started_at)
            .num_seconds();

        println!(
            "{}",
            format!(
                "{}/{} sample(s) completed in {}s:",
                self.completed(),
                self.outcomes.len(),
                seconds
            )
            .bold()
        );
        println!();
        for outcome in &self.outcomes {
            print_outcome(outcome);
        }
    }
}

fn print_outcome(outcome: &SampleOutcome) {
    let name = outcome.sample.cyan();
    match &outcome.outcome {
        Outcome::Completed { job_id, output } => {
            println!("  {} {} {}", "✓".green(), name, job_id.dimmed());
            println!("    Saved:   {}", output.display());
        }
        Outcome::Failed { job_id, reason } => {
            println!("  {} {} {}", "✗".red(), name, job_id.dimmed());
            println!("    Failed:  {}", reason.red());
        }
        Outcome::Abandoned { job_id, failures } => {
            println!("  {} {} {}", "✗".red(), name, job_id.dimmed());
            println!(
                "    Abandoned after {} consecutive poll failures",
                failures
            );
        }
        Outcome::Cancelled { job_id, last_state } => {
            println!("  {} {} {}", "■".yellow(), name, job_id.dimmed());
            println!("    Stopped while {}", last_state.to_string().yellow());
        }
        Outcome::Skipped { reason } => {
            println!("  {} {}", "-".yellow(), name);
            println!("    Skipped: {}", reason.yellow());
        }
    }
}
