/// Sidecar annotations for the elevation map
///
/// A YAML file naming labels (rotated text with a marker circle) and height
/// callouts along the track. It may also replace the slope color table.

use std::fs;
use std::path::Path;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProfileError;
use crate::gradient_color::{GradientTable, Keypoint};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Annotations {
    #[serde(default, rename = "labelpoint")]
    pub label_points: Vec<LabelPoint>,
    #[serde(default, rename = "heightpoint")]
    pub height_points: Vec<HeightPoint>,
    #[serde(default)]
    pub gradient: Option<Vec<KeypointSpec>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LabelPoint {
    /// Distance marker in meters
    pub dist: f64,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HeightPoint {
    pub dist: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KeypointSpec {
    pub color: String,
    pub position: f64,
}

impl Annotations {
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ProfileError::Annotations(format!("{}: {}", path.display(), e)))?;
        let annotations = Self::parse(&content)?;

        debug!(
            "Loaded {} labels and {} height points from {}",
            annotations.label_points.len(),
            annotations.height_points.len(),
            path.display()
        );

        Ok(annotations)
    }

    pub fn parse(content: &str) -> Result<Self, ProfileError> {
        // An empty document is a valid "nothing to annotate"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ProfileError::Annotations(e.to_string()))
    }

    /// The color table to render with: the custom one if given, else the default.
    pub fn gradient_table(&self) -> Result<GradientTable, ProfileError> {
        match &self.gradient {
            Some(specs) => {
                let keypoints = specs
                    .iter()
                    .map(|spec| Keypoint::from_hex(&spec.color, spec.position))
                    .collect::<Result<Vec<_>, _>>()?;
                let table = GradientTable::new(keypoints)?;
                debug!("Using custom gradient table with {} keypoints", table.keypoints().len());
                Ok(table)
            }
            None => Ok(GradientTable::slope_default()),
        }
    }
}
