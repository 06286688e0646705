pub mod config;
pub mod detection;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod sizing;

pub use config::{ClusteringConfig, EstimatorConfig, PaperSize};
pub use detection::FootEstimator;
pub use detection::clustering::{KMeans, Partition, TwoClusterPartition};
pub use error::{DetectionPass, FootError, Result};
pub use models::{BoundingBox, MeasurementResult};
pub use pipeline::{DebugConfig, Stage};
pub use sizing::{SizeCatalog, SizeChart, SizeRow};

use image::RgbImage;

/// Measure the foot in a photograph using A4 paper and the default seed
pub fn estimate_foot_parameters(image: &RgbImage) -> Result<MeasurementResult> {
    FootEstimator::new().estimate(image)
}
