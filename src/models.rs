use std::fmt;

use image::RgbImage;
use serde::Serialize;

/// Axis-aligned box in pixel coordinates, sizes counted inclusively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Long side over short side
    pub fn aspect_ratio(&self) -> f64 {
        let long = self.width.max(self.height) as f64;
        let short = self.width.min(self.height) as f64;
        if short == 0.0 {
            return 0.0;
        }
        long / short
    }

    /// Clamp the box so it lies inside an image of the given size
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Self {
        let x = self.x.min(image_width);
        let y = self.y.min(image_height);
        Self {
            x,
            y,
            width: self.width.min(image_width - x),
            height: self.height.min(image_height - y),
        }
    }

    pub fn crop(&self, img: &RgbImage) -> RgbImage {
        let region = self.clamp_to(img.width(), img.height());
        image::imageops::crop_imm(img, region.x, region.y, region.width, region.height).to_image()
    }
}

/// Calibrated output of one successful measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementResult {
    pub foot_height: u32,
    pub foot_width: u32,
    pub paper_height: u32,
    pub paper_width: u32,
    /// Foot length in centimeters, rounded to two decimals
    pub foot_size_cm: f64,
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} cm (foot {}x{} px, paper {}x{} px)",
            self.foot_size_cm, self.foot_width, self.foot_height, self.paper_width, self.paper_height
        )
    }
}

/// Round half away from zero to two decimal places
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
