mod common;

use std::collections::HashSet;

use footsize::detection::clustering::{KMeans, Sample, TwoClusterPartition};
use footsize::detection::preprocessing::preprocess;
use footsize::detection::segmentation::segment;
use image::Rgb;

use common::*;

fn distinct_colors(img: &image::RgbImage) -> HashSet<[u8; 3]> {
    img.pixels().map(|p| p.0).collect()
}

#[test]
fn test_kmeans_separates_two_groups() {
    let mut samples: Vec<Sample> = Vec::new();
    for i in 0..50 {
        let jitter = i as f32 * 0.001;
        samples.push([0.1 + jitter, 0.1, 0.1]);
        samples.push([0.9 - jitter, 0.9, 0.9]);
    }

    let partition = KMeans::new(0).partition(&samples);
    assert_eq!(partition.labels.len(), samples.len());
    assert_eq!(partition.effective_clusters(), 2);

    // even indices are dark, odd ones bright; each group shares a label
    let dark = partition.labels[0];
    let bright = partition.labels[1];
    assert_ne!(dark, bright);
    for (i, &label) in partition.labels.iter().enumerate() {
        let expected = if i % 2 == 0 { dark } else { bright };
        assert_eq!(label, expected, "sample {i} in wrong cluster");
    }

    let dark_center = partition.centroids[dark as usize];
    assert!(dark_center[0] < 0.2);
}

#[test]
fn test_kmeans_is_deterministic_for_a_seed() {
    let samples: Vec<Sample> = (0..200)
        .map(|i| {
            let t = (i as f32 * 0.37).sin().abs();
            [t, 1.0 - t, (t * 3.0).fract()]
        })
        .collect();

    let a = KMeans::new(42).partition(&samples);
    let b = KMeans::new(42).partition(&samples);
    assert_eq!(a, b);
}

#[test]
fn test_kmeans_handles_empty_and_identical_samples() {
    let empty = KMeans::default().partition(&[]);
    assert!(empty.labels.is_empty());

    let same = vec![[0.5f32, 0.25, 0.75]; 30];
    let partition = KMeans::default().partition(&same);
    assert_eq!(partition.effective_clusters(), 1);
}

#[test]
fn test_segment_two_colors() {
    let img = split_image(40, 30, BACKGROUND, PAPER);
    let segmented = segment(&preprocess(&img), &KMeans::default());

    assert_eq!(segmented.image.dimensions(), (40, 30));
    assert_eq!(segmented.effective_clusters, 2);
    let colors = distinct_colors(&segmented.image);
    assert!(colors.len() <= 2);
    for color in &colors {
        assert!(segmented.palette.contains(&Rgb(*color)));
    }
    // the two far edges cannot share a cluster
    assert_ne!(segmented.image.get_pixel(0, 0), segmented.image.get_pixel(39, 0));
}

#[test]
fn test_segment_never_exceeds_two_colors() {
    let img = synthetic_photo();
    let segmented = segment(&preprocess(&img), &KMeans::default());
    assert!(distinct_colors(&segmented.image).len() <= 2);
}

#[test]
fn test_segment_uniform_image_yields_one_color() {
    let img = uniform_image(25, 25, SKIN);
    let segmented = segment(&preprocess(&img), &KMeans::default());
    assert_eq!(segmented.effective_clusters, 1);
    assert_eq!(distinct_colors(&segmented.image).len(), 1);
}

#[test]
fn test_segment_is_reproducible() {
    let unit = preprocess(&synthetic_photo());
    let a = segment(&unit, &KMeans::new(0));
    let b = segment(&unit, &KMeans::new(0));
    assert_eq!(a.image, b.image);
    assert_eq!(a.palette, b.palette);
}
