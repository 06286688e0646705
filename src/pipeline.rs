use image::DynamicImage;
use std::path::{Path, PathBuf};

use crate::error::{FootError, Result};

/// Intermediate images the measurement can dump for inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Preprocessed,
    Segmented,
    Edges,
    PaperCrop,
    Overlay,
    OverlayEdges,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Input,
        Stage::Preprocessed,
        Stage::Segmented,
        Stage::Edges,
        Stage::PaperCrop,
        Stage::Overlay,
        Stage::OverlayEdges,
    ];

    pub fn name(&self) -> &str {
        match self {
            Stage::Input => "input",
            Stage::Preprocessed => "preprocessed",
            Stage::Segmented => "segmented",
            Stage::Edges => "edges",
            Stage::PaperCrop => "paper_crop",
            Stage::Overlay => "overlay",
            Stage::OverlayEdges => "overlay_edges",
        }
    }

    /// File name inside the debug directory, e.g. "03_edges.png"
    pub fn file_name(&self) -> String {
        let index = Stage::ALL.iter().position(|s| s == self).unwrap_or(0);
        format!("{:02}_{}.png", index, self.name())
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let mut entries =
                std::fs::read_dir(&output_dir).map_err(|e| FootError::io(&output_dir, e))?;
            if entries.next().is_some() {
                return Err(FootError::Config {
                    message: format!("Debug directory is not empty: {}", output_dir.display()),
                });
            }
        } else {
            std::fs::create_dir_all(&output_dir).map_err(|e| FootError::io(&output_dir, e))?;
        }

        Ok(Self { output_dir })
    }

    pub fn path_for(&self, stage: Stage) -> PathBuf {
        self.output_dir.join(stage.file_name())
    }

    /// Save one stage output as PNG; float images are converted to 8 bits
    pub fn save(&self, stage: Stage, image: impl Into<DynamicImage>) -> Result<()> {
        let image = match image.into() {
            DynamicImage::ImageRgb32F(img) => {
                DynamicImage::ImageRgb8(DynamicImage::ImageRgb32F(img).to_rgb8())
            }
            other => other,
        };
        let path = self.path_for(stage);
        save_png(&image, &path)?;
        tracing::debug!(stage = stage.name(), path = %path.display(), "saved debug image");
        Ok(())
    }
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| FootError::DebugOutput {
            path: path.to_path_buf(),
            source,
        })
}
