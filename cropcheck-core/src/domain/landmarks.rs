//! Landmark domain types
//!
//! Landmark files are produced by an external face-mesh extractor as a literal
//! structure `{'landmarks': [[{'x': .., 'y': ..}, ...]]}`. The outer sequence
//! holds one entry per detected face; only the first face is used.

use serde::{Deserialize, Serialize};

/// A 2-D point in pixel coordinates of the original image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Ordered landmark points for a single face
///
/// Length and ordering are defined by the service and are passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Point>);

#[derive(Debug, Deserialize)]
struct LandmarkFile {
    landmarks: Vec<Vec<Point>>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Parses a landmark file's contents
    ///
    /// Accepts strict JSON as well as the single-quoted literal form written by
    /// the extractor. Returns a human-readable reason on failure.
    ///
    /// The literal form is read by swapping every `'` for `"`, so string
    /// values containing an apostrophe do not survive it. Landmark files
    /// only carry numeric `x`/`y` entries.
    pub fn parse(text: &str) -> Result<Self, String> {
        let file = match serde_json::from_str::<LandmarkFile>(text) {
            Ok(file) => file,
            Err(json_err) => serde_json::from_str::<LandmarkFile>(&text.replace('\'', "\""))
                .map_err(|_| json_err.to_string())?,
        };

        file.landmarks
            .into_iter()
            .next()
            .map(Self)
            .ok_or_else(|| "`landmarks` holds no face".to_string())
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
