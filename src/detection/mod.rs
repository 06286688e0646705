pub mod clustering;
pub mod contours;
pub mod edges;
pub mod preprocessing;
pub mod refine;
pub mod segmentation;

use image::{Rgb, RgbImage};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::EstimatorConfig;
use crate::error::{DetectionPass, FootError, Result};
use crate::models::{BoundingBox, MeasurementResult};
use crate::pipeline::{DebugConfig, Stage};
use clustering::{KMeans, TwoClusterPartition};
use contours::ContourSet;
use refine::MIN_RANKED_CONTOURS;
use segmentation::ClusterAssignment;

/// Two-pass foot measurement orchestrator.
///
/// Stateless apart from its configuration: `estimate` can be called from many
/// threads at once on a shared estimator.
pub struct FootEstimator {
    config: EstimatorConfig,
    partitioner: Arc<dyn TwoClusterPartition>,
    debug: Option<DebugConfig>,
}

impl FootEstimator {
    pub fn new() -> Self {
        Self::with_config(EstimatorConfig::default())
    }

    pub fn with_config(config: EstimatorConfig) -> Self {
        let partitioner = Arc::new(KMeans::from_config(&config.clustering));
        Self {
            config,
            partitioner,
            debug: None,
        }
    }

    /// Replace the default seeded k-means
    pub fn with_partitioner(mut self, partitioner: Arc<dyn TwoClusterPartition>) -> Self {
        self.partitioner = partitioner;
        self
    }

    /// Save every intermediate image into `output_dir`, which must be empty
    /// or not exist yet
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.debug = Some(DebugConfig::new(output_dir)?);
        Ok(self)
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn dump(&self, stage: Stage, image: impl Into<image::DynamicImage>) -> Result<()> {
        match &self.debug {
            Some(debug) => debug.save(stage, image),
            None => Ok(()),
        }
    }

    /// Preprocess, segment and rank the regions of the whole photograph
    pub fn first_pass(&self, img: &RgbImage) -> Result<(ClusterAssignment, ContourSet)> {
        let unit = preprocessing::preprocess(img);
        if self.debug.is_some() {
            self.dump(Stage::Preprocessed, unit.clone())?;
        }

        let segmented = segmentation::segment(&unit, self.partitioner.as_ref());
        tracing::debug!(
            partitioner = self.partitioner.name(),
            clusters = segmented.effective_clusters,
            palette = ?segmented.palette,
            "segmented image"
        );
        if self.debug.is_some() {
            self.dump(Stage::Segmented, segmented.image.clone())?;
        }

        let edges = edges::extract_edge_map(&segmented.image);
        if self.debug.is_some() {
            self.dump(Stage::Edges, edges.clone())?;
        }

        let regions = contours::analyze_contours(&edges);
        tracing::debug!(
            contours = regions.len(),
            holes = regions.hole_count(),
            "pass 1 contours"
        );
        Ok((segmented, regions))
    }

    /// Locate the foot inside the paper and calibrate, given the segmented
    /// photo and its ranked pass-1 boxes
    pub fn measure_segmented(
        &self,
        segmented: &RgbImage,
        boxes: &[BoundingBox],
    ) -> Result<MeasurementResult> {
        let paper_box = refine::select_paper_boundary(boxes, &self.config.paper)?;
        let crop = refine::crop_paper(segmented, &paper_box);
        let overlay = refine::build_overlay(&crop, Rgb(self.config.overlay_color));
        if self.debug.is_some() {
            self.dump(Stage::PaperCrop, crop.paper.clone())?;
            self.dump(Stage::Overlay, overlay.clone())?;
        }

        let overlay_edges = edges::extract_edge_map(&overlay);
        if self.debug.is_some() {
            self.dump(Stage::OverlayEdges, overlay_edges.clone())?;
        }

        let foot_regions = contours::analyze_contours(&overlay_edges);
        tracing::debug!(contours = foot_regions.len(), "pass 2 contours");
        let foot_box = refine::select_foot_silhouette(&foot_regions.boxes)?;

        let (foot_width, foot_height) = refine::foot_dimensions(&foot_box, &crop.inset);
        let (paper_width, paper_height) = (crop.width(), crop.height());
        let foot_size_cm = refine::calibrate(
            foot_width,
            foot_height,
            paper_width,
            paper_height,
            &self.config.paper,
        );

        Ok(MeasurementResult {
            foot_height,
            foot_width,
            paper_height,
            paper_width,
            foot_size_cm,
        })
    }

    /// Run the full measurement on one photograph
    pub fn estimate(&self, img: &RgbImage) -> Result<MeasurementResult> {
        let (width, height) = img.dimensions();
        let _span = tracing::debug_span!("estimate", width, height).entered();

        if width == 0 || height == 0 {
            return Err(FootError::Detection {
                pass: DetectionPass::First,
                found: 0,
                required: MIN_RANKED_CONTOURS,
            });
        }
        if self.debug.is_some() {
            self.dump(Stage::Input, img.clone())?;
        }

        let (segmented, regions) = self.first_pass(img)?;
        let result = self.measure_segmented(&segmented.image, &regions.boxes)?;

        tracing::info!(
            foot_size_cm = result.foot_size_cm,
            foot_width = result.foot_width,
            foot_height = result.foot_height,
            paper_width = result.paper_width,
            paper_height = result.paper_height,
            "foot measured"
        );
        Ok(result)
    }
}

impl Default for FootEstimator {
    fn default() -> Self {
        Self::new()
    }
}
