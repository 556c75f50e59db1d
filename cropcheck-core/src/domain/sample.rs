//! Sample domain model
//!
//! A sample is one folder on disk holding the inputs for a single crop job
//! and, once the job succeeds, its output.

use std::path::PathBuf;

/// File name of the primary image inside a sample folder
pub const IMAGE_FILE: &str = "original_image.png";

/// File name of the segmentation map inside a sample folder
pub const SEGMENTATION_MAP_FILE: &str = "segmentation_map.png";

/// File name of the landmark literal inside a sample folder
pub const LANDMARKS_FILE: &str = "landmarks.txt";

/// File name of the result artifact written on success
pub const OUTPUT_FILE: &str = "output.svg";

/// A sample folder identified by its name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sample {
    /// Folder name, used as the sample identifier in logs and reports
    pub name: String,

    /// Absolute or root-relative path of the folder
    pub dir: PathBuf,
}

impl Sample {
    /// Creates a sample from its folder, naming it after the last path component
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.to_string_lossy().into_owned());
        Self { name, dir }
    }

    pub fn image_path(&self) -> PathBuf {
        self.dir.join(IMAGE_FILE)
    }

    pub fn segmentation_map_path(&self) -> PathBuf {
        self.dir.join(SEGMENTATION_MAP_FILE)
    }

    pub fn landmarks_path(&self) -> PathBuf {
        self.dir.join(LANDMARKS_FILE)
    }

    /// Where the result artifact lands once the job completes
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILE)
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_named_after_folder() {
        let sample = Sample::from_dir("samples/images/01");
        assert_eq!(sample.name, "01");
        assert_eq!(
            sample.output_path(),
            PathBuf::from("samples/images/01/output.svg")
        );
        assert_eq!(
            sample.landmarks_path(),
            PathBuf::from("samples/images/01/landmarks.txt")
        );
    }
}
