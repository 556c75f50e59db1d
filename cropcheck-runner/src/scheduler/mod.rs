//! Scheduler layer for the runner
//!
//! This layer polls the service for the status of submitted jobs and
//! moves each one to a terminal state, persisting results as they arrive.

pub mod poller;

pub use poller::JobPoller;
