use image::{Rgb, Rgb32FImage, RgbImage};

use crate::detection::clustering::{Sample, TwoClusterPartition};

/// Image reduced to (at most) two palette colors
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    /// Every pixel replaced by its cluster centroid, rescaled to 8 bits
    pub image: RgbImage,
    pub palette: [Rgb<u8>; 2],
    /// How many of the two clusters received pixels
    pub effective_clusters: usize,
}

/// Cluster the unit-range pixels into two groups and paint each pixel with
/// its group's centroid
pub fn segment(img: &Rgb32FImage, partitioner: &dyn TwoClusterPartition) -> ClusterAssignment {
    let samples: Vec<Sample> = img.pixels().map(|p| p.0).collect();
    let partition = partitioner.partition(&samples);

    let palette = [
        centroid_to_pixel(&partition.centroids[0]),
        centroid_to_pixel(&partition.centroids[1]),
    ];

    let mut image = RgbImage::new(img.width(), img.height());
    for (pixel, &label) in image.pixels_mut().zip(&partition.labels) {
        *pixel = palette[label as usize];
    }

    ClusterAssignment {
        image,
        palette,
        effective_clusters: partition.effective_clusters(),
    }
}

/// Scale a unit-range centroid back to 8 bits, truncating
fn centroid_to_pixel(centroid: &Sample) -> Rgb<u8> {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
    Rgb([channel(centroid[0]), channel(centroid[1]), channel(centroid[2])])
}
