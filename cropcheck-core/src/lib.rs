//! Cropcheck Core
//!
//! Core types and abstractions for the cropcheck service exerciser.
//!
//! This crate contains:
//! - Domain types: samples, landmark sets, jobs and poll snapshots
//! - DTOs: wire bodies exchanged with the crop service
//! - Protocol selection and the payload builder that turns a sample into a request

pub mod domain;
pub mod dto;
pub mod error;
pub mod payload;
pub mod protocol;

pub use error::PayloadError;
pub use payload::{JobRequest, build};
pub use protocol::{ProtocolVersion, Region};
