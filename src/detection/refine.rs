//! Second pass of the measurement and the pixel-to-millimeter conversion.
//!
//! Contour selection is positional. After sorting by area, pass 1 is
//! expected to rank the photo's own frame first and the paper sheet second;
//! pass 2, run on the overlay, ranks the overlay frame first, the leftover
//! paper margin second and the foot third. Nothing checks what the selected
//! regions look like, so a photo that breaks this ordering measures the wrong
//! region. The selection functions log enough to spot that.

use image::{Rgb, RgbImage};

use crate::config::PaperSize;
use crate::error::{DetectionPass, FootError, Result};
use crate::models::{BoundingBox, round_to_hundredths};

/// Both passes need at least this many ranked regions
pub const MIN_RANKED_CONTOURS: usize = 3;

/// Rank of the paper sheet in pass 1
pub const PAPER_RANK: usize = 1;

/// Rank of the foot in pass 2
pub const FOOT_RANK: usize = 2;

/// The inset trims one tenth of the paper crop on every side
pub const INSET_DIVISOR: u32 = 10;

/// Relative aspect-ratio deviation from the sheet above which we warn
const ASPECT_WARN_TOLERANCE: f64 = 0.25;

/// Margins removed around the paper crop before looking for the foot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inset {
    pub x_margin: u32,
    pub y_margin: u32,
}

impl Inset {
    pub fn of(width: u32, height: u32) -> Self {
        Self {
            x_margin: width / INSET_DIVISOR,
            y_margin: height / INSET_DIVISOR,
        }
    }
}

/// Segmented image cut down to the paper, plus its inset interior
#[derive(Debug, Clone)]
pub struct PaperCrop {
    pub paper: RgbImage,
    pub foot: RgbImage,
    pub inset: Inset,
}

impl PaperCrop {
    pub fn width(&self) -> u32 {
        self.paper.width()
    }

    pub fn height(&self) -> u32 {
        self.paper.height()
    }
}

fn require_ranked(boxes: &[BoundingBox], pass: DetectionPass) -> Result<()> {
    if boxes.len() < MIN_RANKED_CONTOURS {
        return Err(FootError::Detection {
            pass,
            found: boxes.len(),
            required: MIN_RANKED_CONTOURS,
        });
    }
    Ok(())
}

/// Pick the paper sheet among the pass-1 boxes.
///
/// Assumes the largest region is the photograph's outer frame and the paper
/// is the next one.
pub fn select_paper_boundary(boxes: &[BoundingBox], paper: &PaperSize) -> Result<BoundingBox> {
    require_ranked(boxes, DetectionPass::First)?;
    let selected = boxes[PAPER_RANK];

    let expected = paper.aspect_ratio();
    let actual = selected.aspect_ratio();
    tracing::debug!(
        rank = PAPER_RANK,
        x = selected.x,
        y = selected.y,
        width = selected.width,
        height = selected.height,
        aspect = actual,
        expected_aspect = expected,
        "selected paper boundary"
    );
    if expected > 0.0 && ((actual - expected) / expected).abs() > ASPECT_WARN_TOLERANCE {
        tracing::warn!(
            aspect = actual,
            expected_aspect = expected,
            "paper candidate does not have the sheet's proportions; rank order may be off"
        );
    }

    Ok(selected)
}

/// Pick the foot among the pass-2 boxes.
///
/// Assumes rank 0 is the overlay's solid frame and rank 1 the paper margin
/// that survived the inset.
pub fn select_foot_silhouette(boxes: &[BoundingBox]) -> Result<BoundingBox> {
    require_ranked(boxes, DetectionPass::Second)?;
    let selected = boxes[FOOT_RANK];
    tracing::debug!(
        rank = FOOT_RANK,
        x = selected.x,
        y = selected.y,
        width = selected.width,
        height = selected.height,
        "selected foot silhouette"
    );
    Ok(selected)
}

/// Cut the paper region out of the segmented image and derive the inset
/// foot region from it
pub fn crop_paper(segmented: &RgbImage, paper_box: &BoundingBox) -> PaperCrop {
    let paper = paper_box.crop(segmented);
    let (width, height) = paper.dimensions();
    let inset = Inset::of(width, height);

    let foot_box = BoundingBox::new(
        inset.x_margin,
        inset.y_margin,
        width - 2 * inset.x_margin,
        height - 2 * inset.y_margin,
    );
    let foot = foot_box.crop(&paper);

    PaperCrop { paper, foot, inset }
}

/// Paper-sized canvas of a solid color with the inset foot region pasted
/// back at its original offset.
///
/// `fill` is in the segmented image's channel space, not RGB.
pub fn build_overlay(crop: &PaperCrop, fill: Rgb<u8>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(crop.width(), crop.height(), fill);
    image::imageops::replace(
        &mut canvas,
        &crop.foot,
        crop.inset.x_margin.into(),
        crop.inset.y_margin.into(),
    );
    canvas
}

/// Foot extent in pixels, adding back one inset margin per axis.
///
/// Returns `(width, height)`.
pub fn foot_dimensions(foot_box: &BoundingBox, inset: &Inset) -> (u32, u32) {
    (
        inset.x_margin + foot_box.width,
        inset.y_margin + foot_box.height,
    )
}

/// Convert the foot's pixel extent to centimeters.
///
/// The driving axis is whichever of width/height is larger, but the scale
/// always uses the sheet's long edge (`paper.height_mm`), divided by the
/// paper crop's pixel size along that same image axis. When the paper is
/// rotated relative to the foot this mixes the two physical axes; the rule
/// is kept as an approximation.
pub fn calibrate(
    foot_width: u32,
    foot_height: u32,
    paper_width: u32,
    paper_height: u32,
    paper: &PaperSize,
) -> f64 {
    let foot_size_mm = if foot_width > foot_height {
        (paper.height_mm / paper_width as f64) * foot_width as f64
    } else {
        (paper.height_mm / paper_height as f64) * foot_height as f64
    };
    round_to_hundredths(foot_size_mm / 10.0)
}
