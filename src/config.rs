use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{FootError, Result};

/// Everything the measurement core can be told from outside
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub paper: PaperSize,
    pub clustering: ClusteringConfig,
    /// Fill of the overlay canvas that hides the paper edge.
    ///
    /// Channel values of the segmented image, which carries HSV
    /// (hue, saturation, value) rather than RGB. The default maxes out the
    /// hue channel, which the white sheet's cluster leaves near zero.
    pub overlay_color: [u8; 3],
}

/// Physical size of the reference sheet, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaperSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Seed of the k-means++ initialisation; same seed, same segmentation
    pub seed: u64,
    pub max_iterations: usize,
    /// Convergence tolerance, relative to the mean per-channel variance
    pub tolerance: f64,
}

impl PaperSize {
    pub const A4: PaperSize = PaperSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    /// Long edge over short edge
    pub fn aspect_ratio(&self) -> f64 {
        let long = self.width_mm.max(self.height_mm);
        let short = self.width_mm.min(self.height_mm);
        if short == 0.0 {
            return 0.0;
        }
        long / short
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::A4
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::default(),
            clustering: ClusteringConfig::default(),
            overlay_color: [255, 0, 0],
        }
    }
}

impl EstimatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FootError::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EstimatorConfig = toml::from_str(content).map_err(|e| FootError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let paper = &self.paper;
        if !(paper.width_mm > 0.0 && paper.height_mm > 0.0) {
            return Err(FootError::Config {
                message: format!(
                    "paper dimensions must be positive, got {}x{} mm",
                    paper.width_mm, paper.height_mm
                ),
            });
        }
        if self.clustering.max_iterations == 0 {
            return Err(FootError::Config {
                message: "clustering.max_iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
