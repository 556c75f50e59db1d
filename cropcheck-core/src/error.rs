//! Error types for payload preparation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a sample folder into a job request
///
/// Every variant names the sample so the driver can skip it and move on.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// A required input file is absent
    #[error("sample {sample}: missing {artifact} at {}", path.display())]
    MissingArtifact {
        sample: String,
        artifact: &'static str,
        path: PathBuf,
    },

    /// The landmark file does not hold the expected structure
    #[error("sample {sample}: malformed landmarks: {reason}")]
    MalformedLandmarks { sample: String, reason: String },

    /// An input file exists but could not be read
    #[error("sample {sample}: failed to read {}: {source}", path.display())]
    Io {
        sample: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PayloadError {
    /// Name of the sample the error belongs to
    pub fn sample(&self) -> &str {
        match self {
            Self::MissingArtifact { sample, .. }
            | Self::MalformedLandmarks { sample, .. }
            | Self::Io { sample, .. } => sample,
        }
    }

    pub fn is_missing_artifact(&self) -> bool {
        matches!(self, Self::MissingArtifact { .. })
    }
}
