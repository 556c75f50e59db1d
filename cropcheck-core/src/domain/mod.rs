//! Core domain types
//!
//! These types describe what the exerciser works on (samples and their
//! landmark sets) and how submitted work is tracked (jobs and poll snapshots).
//! They are shared between the client (which produces snapshots) and the
//! runner (which owns jobs).

pub mod job;
pub mod landmarks;
pub mod sample;
