//! Payload builder
//!
//! Turns a sample folder into a [`JobRequest`]. Reads the three input files
//! and nothing else, so the same folder always yields the same request.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::Path;

use crate::domain::landmarks::LandmarkSet;
use crate::domain::sample::Sample;
use crate::dto::job::SubmitJob;
use crate::error::PayloadError;
use crate::protocol::{ProtocolVersion, Region};

/// Everything the service needs to process one sample
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub image: Vec<u8>,
    pub segmentation_map: Vec<u8>,
    pub landmarks: LandmarkSet,
    /// Present only under protocol versions that take regions
    pub regions: Option<Vec<Region>>,
}

impl JobRequest {
    /// Encodes the request into its JSON transport form
    pub fn to_wire(&self) -> SubmitJob {
        SubmitJob {
            image: STANDARD.encode(&self.image),
            segmentation_map: STANDARD.encode(&self.segmentation_map),
            landmarks: self.landmarks.clone(),
            regions: self.regions.clone(),
        }
    }
}

/// Builds the request for `sample` under `version`
///
/// # Errors
/// * [`PayloadError::MissingArtifact`] if any input file is absent
/// * [`PayloadError::MalformedLandmarks`] if the landmark file does not parse
pub fn build(sample: &Sample, version: ProtocolVersion) -> Result<JobRequest, PayloadError> {
    let image = read_artifact(sample, "image", &sample.image_path())?;
    let segmentation_map =
        read_artifact(sample, "segmentation map", &sample.segmentation_map_path())?;
    let landmark_bytes = read_artifact(sample, "landmarks", &sample.landmarks_path())?;

    let text = String::from_utf8(landmark_bytes).map_err(|e| PayloadError::MalformedLandmarks {
        sample: sample.name.clone(),
        reason: format!("not valid UTF-8: {}", e),
    })?;
    let landmarks = LandmarkSet::parse(&text).map_err(|reason| PayloadError::MalformedLandmarks {
        sample: sample.name.clone(),
        reason,
    })?;

    let regions = version.includes_regions().then(|| Region::ALL.to_vec());

    Ok(JobRequest {
        image,
        segmentation_map,
        landmarks,
        regions,
    })
}

fn read_artifact(
    sample: &Sample,
    artifact: &'static str,
    path: &Path,
) -> Result<Vec<u8>, PayloadError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PayloadError::MissingArtifact {
                sample: sample.name.clone(),
                artifact,
                path: path.to_path_buf(),
            }
        } else {
            PayloadError::Io {
                sample: sample.name.clone(),
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::landmarks::Point;
    use crate::domain::sample::{IMAGE_FILE, LANDMARKS_FILE, SEGMENTATION_MAP_FILE};
    use tempfile::TempDir;

    fn write_sample(root: &TempDir, name: &str, with_segmentation: bool) -> Sample {
        let dir = root.path().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(IMAGE_FILE), b"\x89PNG image").unwrap();
        if with_segmentation {
            std::fs::write(dir.join(SEGMENTATION_MAP_FILE), b"\x89PNG mask").unwrap();
        }
        std::fs::write(
            dir.join(LANDMARKS_FILE),
            "{'landmarks': [[{'x': 10.5, 'y': 20.25}, {'x': 11.0, 'y': 21.0}]]}",
        )
        .unwrap();
        Sample::from_dir(dir)
    }

    #[test]
    fn test_build_v2_attaches_regions() {
        let root = tempfile::tempdir().unwrap();
        let sample = write_sample(&root, "01", true);

        let request = build(&sample, ProtocolVersion::V2).unwrap();
        assert_eq!(request.image, b"\x89PNG image");
        assert_eq!(request.segmentation_map, b"\x89PNG mask");
        assert_eq!(request.regions, Some(Region::ALL.to_vec()));
        assert_eq!(request.landmarks.points()[0], Point { x: 10.5, y: 20.25 });
    }

    #[test]
    fn test_build_v1_omits_regions() {
        let root = tempfile::tempdir().unwrap();
        let sample = write_sample(&root, "01", true);

        let request = build(&sample, ProtocolVersion::V1).unwrap();
        assert!(request.regions.is_none());
        assert!(
            serde_json::to_value(request.to_wire())
                .unwrap()
                .get("regions")
                .is_none()
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let root = tempfile::tempdir().unwrap();
        let sample = write_sample(&root, "01", true);

        let encode = || {
            let request = build(&sample, ProtocolVersion::V2).unwrap();
            serde_json::to_vec(&request.to_wire()).unwrap()
        };
        assert_eq!(encode(), encode());
    }

    #[test]
    fn test_missing_segmentation_map() {
        let root = tempfile::tempdir().unwrap();
        let sample = write_sample(&root, "02", false);

        let err = build(&sample, ProtocolVersion::V2).unwrap_err();
        assert!(err.is_missing_artifact());
        assert_eq!(err.sample(), "02");
    }

    #[test]
    fn test_malformed_landmarks() {
        let root = tempfile::tempdir().unwrap();
        let sample = write_sample(&root, "03", true);
        std::fs::write(sample.landmarks_path(), "{'landmarks': 'nope'}").unwrap();

        let err = build(&sample, ProtocolVersion::V1).unwrap_err();
        assert!(matches!(err, PayloadError::MalformedLandmarks { .. }));
    }

    #[test]
    fn test_wire_form_is_base64() {
        let root = tempfile::tempdir().unwrap();
        let sample = write_sample(&root, "01", true);

        let wire = build(&sample, ProtocolVersion::V2).unwrap().to_wire();
        assert_eq!(STANDARD.decode(&wire.image).unwrap(), b"\x89PNG image");
        assert_eq!(STANDARD.decode(&wire.segmentation_map).unwrap(), b"\x89PNG mask");
        assert_eq!(wire.landmarks.len(), 2);
    }
}
