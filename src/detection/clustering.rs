//! Two-way color clustering used to split the photo into foreground and
//! background.
//!
//! The segmenter only needs "some deterministic partition of the pixel
//! vectors into two groups", so the algorithm sits behind
//! [`TwoClusterPartition`]. [`KMeans`] is the implementation used by default:
//! k-means++ seeding from a seeded [`StdRng`], then Lloyd iterations. Two runs
//! with the same seed over the same samples give bit-identical partitions.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::ClusteringConfig;

/// One pixel vector in the preprocessed color space
pub type Sample = [f32; 3];

/// Result of a two-way partition
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub centroids: [Sample; 2],
    /// Cluster index (0 or 1) of every sample, in input order
    pub labels: Vec<u8>,
}

impl Partition {
    /// Number of clusters that actually received samples
    pub fn effective_clusters(&self) -> usize {
        let ones = self.labels.iter().filter(|&&l| l == 1).count();
        let zeros = self.labels.len() - ones;
        (zeros > 0) as usize + (ones > 0) as usize
    }
}

/// Anything that can split samples into exactly two clusters.
///
/// Implementations must be deterministic for a given configuration.
pub trait TwoClusterPartition: Send + Sync {
    fn partition(&self, samples: &[Sample]) -> Partition;

    fn name(&self) -> &str;
}

/// Seeded k-means with k = 2
#[derive(Debug, Clone)]
pub struct KMeans {
    pub seed: u64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl KMeans {
    pub fn new(seed: u64) -> Self {
        Self::from_config(&ClusteringConfig {
            seed,
            ..Default::default()
        })
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self {
            seed: config.seed,
            max_iterations: config.max_iterations.max(1),
            tolerance: config.tolerance,
        }
    }

    /// k-means++ seeding for two centers
    fn initial_centroids(&self, samples: &[Sample], rng: &mut StdRng) -> [Sample; 2] {
        let first = samples[rng.gen_range(0..samples.len())];
        let distances: Vec<f64> = samples
            .iter()
            .map(|s| squared_distance(s, &first))
            .collect();
        let total: f64 = distances.iter().sum();
        if total <= 0.0 {
            // every sample is identical to the first center
            return [first, first];
        }

        let target = rng.gen_range(0.0..total);
        let mut acc = 0.0;
        let mut fallback = first;
        for (sample, distance) in samples.iter().zip(&distances) {
            if *distance > 0.0 {
                fallback = *sample;
            }
            acc += distance;
            if acc > target {
                return [first, *sample];
            }
        }
        [first, fallback]
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::from_config(&ClusteringConfig::default())
    }
}

impl TwoClusterPartition for KMeans {
    fn partition(&self, samples: &[Sample]) -> Partition {
        if samples.is_empty() {
            return Partition {
                centroids: [[0.0; 3]; 2],
                labels: Vec::new(),
            };
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.initial_centroids(samples, &mut rng);
        let threshold = self.tolerance * mean_variance(samples);
        let mut labels = vec![0u8; samples.len()];

        for iteration in 0..self.max_iterations {
            assign(samples, &centroids, &mut labels);

            let mut sums = [[0.0f64; 3]; 2];
            let mut counts = [0usize; 2];
            for (sample, &label) in samples.iter().zip(&labels) {
                let k = label as usize;
                counts[k] += 1;
                for c in 0..3 {
                    sums[k][c] += sample[c] as f64;
                }
            }

            let mut shift = 0.0;
            for k in 0..2 {
                // an empty cluster keeps its previous center
                if counts[k] == 0 {
                    continue;
                }
                let updated = [
                    (sums[k][0] / counts[k] as f64) as f32,
                    (sums[k][1] / counts[k] as f64) as f32,
                    (sums[k][2] / counts[k] as f64) as f32,
                ];
                shift += squared_distance(&centroids[k], &updated);
                centroids[k] = updated;
            }

            if shift <= threshold {
                tracing::trace!(iteration, shift, "k-means converged");
                break;
            }
        }

        assign(samples, &centroids, &mut labels);
        Partition { centroids, labels }
    }

    fn name(&self) -> &str {
        "k-means"
    }
}

fn assign(samples: &[Sample], centroids: &[Sample; 2], labels: &mut [u8]) {
    for (label, sample) in labels.iter_mut().zip(samples) {
        let d0 = squared_distance(sample, &centroids[0]);
        let d1 = squared_distance(sample, &centroids[1]);
        // ties go to the lower index
        *label = if d1 < d0 { 1 } else { 0 };
    }
}

fn squared_distance(a: &Sample, b: &Sample) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}

/// Mean of the per-channel variances
fn mean_variance(samples: &[Sample]) -> f64 {
    let n = samples.len() as f64;
    let mut mean = [0.0f64; 3];
    for sample in samples {
        for c in 0..3 {
            mean[c] += sample[c] as f64;
        }
    }
    for m in &mut mean {
        *m /= n;
    }

    let mut variance = 0.0;
    for sample in samples {
        for c in 0..3 {
            let d = sample[c] as f64 - mean[c];
            variance += d * d;
        }
    }
    variance / (n * 3.0)
}
