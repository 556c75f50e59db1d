//! Data Transfer Objects for the crop service
//!
//! This module contains the JSON bodies exchanged with the remote service.
//! Both protocol versions share these shapes; they differ only in URL layout
//! and in whether `regions` is present.

pub mod job;
