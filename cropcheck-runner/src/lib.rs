//! Cropcheck Runner
//!
//! Exercises the remote crop service end to end.
//!
//! Architecture:
//! - Configuration: run settings, validated before anything is sent
//! - Driver: sample discovery, payload building and submission
//! - Registry: the set of jobs that are still outstanding
//! - Scheduler: poll rounds that move every job to a terminal state
//! - Output/Report: result persistence and the end-of-run summary

pub mod config;
pub mod driver;
pub mod output;
pub mod registry;
pub mod report;
pub mod scheduler;

pub use config::Config;
pub use registry::JobRegistry;
pub use report::{Outcome, RunReport, SampleOutcome};
pub use scheduler::JobPoller;
