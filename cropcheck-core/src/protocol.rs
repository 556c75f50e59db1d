//! Protocol selection
//!
//! The crop service exposes two API shapes. `v1` uses a fixed resource path
//! (`/api/v1/frontal/crop/...`); `v2` uses a generic job resource
//! (`/api/v2/jobs`) and additionally takes a list of facial regions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Supported wire protocol versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    /// Fixed-resource-path API
    V1,
    /// Generic job-resource API
    V2,
}

impl ProtocolVersion {
    /// Whether submit bodies under this version carry a region list
    pub fn includes_regions(self) -> bool {
        matches!(self, ProtocolVersion::V2)
    }
}

/// Raised at startup for any protocol selector other than `v1` or `v2`
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported API version '{0}', use 'v1' or 'v2'")]
pub struct UnsupportedProtocol(pub String);

impl FromStr for ProtocolVersion {
    type Err = UnsupportedProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(ProtocolVersion::V1),
            "v2" => Ok(ProtocolVersion::V2),
            _ => Err(UnsupportedProtocol(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolVersion::V1 => write!(f, "v1"),
            ProtocolVersion::V2 => write!(f, "v2"),
        }
    }
}

/// Facial sub-area requested for processing under `v2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Forehead,
    Nose,
    RightUndereye,
    LeftUndereye,
    LowFace,
}

impl Region {
    /// The fixed region list, in the order the service expects
    pub const ALL: [Region; 5] = [
        Region::Forehead,
        Region::Nose,
        Region::RightUndereye,
        Region::LeftUndereye,
        Region::LowFace,
    ];
}
