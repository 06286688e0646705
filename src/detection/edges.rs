use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::{dilate, erode};

pub const CANNY_LOW_THRESHOLD: f32 = 0.0;
pub const CANNY_HIGH_THRESHOLD: f32 = 255.0;

/// Chebyshev radius 1, i.e. a 3x3 square structuring element
const CLOSING_RADIUS: u8 = 1;

/// Smallest gradient magnitude that can count as an edge.
///
/// imageproc's hysteresis keeps pixels with magnitude >= low, so a literal
/// zero low threshold would flood every flat region touching an edge.
const MIN_GRADIENT: f32 = 1.0;

/// Detect edges in one channel using Canny
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let low = low_threshold.max(MIN_GRADIENT);
    let high = high_threshold.max(low);
    canny(img, low, high)
}

/// Dilation followed by erosion with a 3x3 element
pub fn close(edges: &GrayImage) -> GrayImage {
    let dilated = dilate(edges, Norm::LInf, CLOSING_RADIUS);
    erode(&dilated, Norm::LInf, CLOSING_RADIUS)
}

fn channel(img: &RgbImage, index: usize) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([img.get_pixel(x, y)[index]])
    })
}

/// Binary edge map of a color image: Canny on every channel, union of the
/// results, then a morphological closing.
pub fn extract_edge_map(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut edges = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return edges;
    }

    for index in 0..3 {
        let channel_edges = detect_edges(
            &channel(img, index),
            CANNY_LOW_THRESHOLD,
            CANNY_HIGH_THRESHOLD,
        );
        for (out, edge) in edges.pixels_mut().zip(channel_edges.pixels()) {
            if edge[0] > 0 {
                *out = Luma([255]);
            }
        }
    }

    close(&edges)
}
