//! Job DTOs for service communication

use serde::{Deserialize, Serialize};

use crate::domain::landmarks::LandmarkSet;
use crate::protocol::Region;

/// Body of a create-job request
///
/// Binary inputs travel as standard base64 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitJob {
    pub image: String,
    pub segmentation_map: String,
    pub landmarks: LandmarkSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Region>>,
}

/// Response to a create-job request
///
/// `id` is optional here so a missing identifier surfaces as a protocol
/// error instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreated {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response to a status request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    /// Base64-encoded result, present once the job succeeded
    #[serde(default)]
    pub svg: Option<String>,
}
