// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seeded k-means grouping of feature vectors
//!
//! Lloyd iterations from k-means++ starting centroids, restarted `n_init`
//! times; the run with the lowest inertia is kept. All randomness is drawn
//! from a [`StdRng`] seeded by [`KMeansConfig::seed`], so identical inputs
//! always yield identical groups.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Uiiv;

/// Parameters of a k-means fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Requested number of groups (clamped to the number of points)
    pub n_clusters: usize,
    /// Number of restarts with different starting centroids
    pub n_init: usize,
    /// Iteration cap per restart
    pub max_iter: usize,
    /// Convergence tolerance, relative to the mean per-feature variance
    pub tol: f64,
    /// Seed for centroid initialisation
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: 4,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            seed: 42,
        }
    }
}

/// Result of a fit: one centroid per group and a group label per point
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansModel {
    centroids: Vec<Uiiv>,
    labels: Vec<usize>,
    inertia: f64,
    iterations: usize,
}

impl KMeansModel {
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    pub fn centroids(&self) -> &[Uiiv] {
        &self.centroids
    }

    /// Group label of every fitted point, by point index
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Sum of squared distances from each point to its centroid
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Index of the nearest centroid (ties go to the lowest index)
    pub fn predict(&self, point: &Uiiv) -> usize {
        nearest_centroid(&self.centroids, point)
    }

    /// Indices of the fitted points assigned to `group`
    pub fn members(&self, group: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == group)
            .map(|(i, _)| i)
            .collect()
    }
}

/// k-means estimator
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn fit(&self, points: &[Uiiv]) -> Result<KMeansModel> {
        let n = points.len();
        if n == 0 {
            return Err(Error::EmptyCatalog);
        }
        let k = self.config.n_clusters.clamp(1, n);

        // One group per point: nothing to optimise
        if k == n {
            return Ok(KMeansModel {
                centroids: points.to_vec(),
                labels: (0..n).collect(),
                inertia: 0.0,
                iterations: 0,
            });
        }

        let tol = self.config.tol * mean_variance(points);
        let mut seeder = StdRng::seed_from_u64(self.config.seed);

        let mut best = self.run_once(points, k, tol, &mut seeder);
        tracing::trace!(run = 0, inertia = best.inertia, "k-means restart");
        for run in 1..self.config.n_init {
            let candidate = self.run_once(points, k, tol, &mut seeder);
            tracing::trace!(run, inertia = candidate.inertia, "k-means restart");
            if candidate.inertia < best.inertia {
                best = candidate;
            }
        }

        tracing::debug!(
            points = n,
            clusters = k,
            inertia = best.inertia,
            iterations = best.iterations,
            "Fitted k-means grouping"
        );
        Ok(best)
    }

    fn run_once(&self, points: &[Uiiv], k: usize, tol: f64, seeder: &mut StdRng) -> KMeansModel {
        let mut rng = StdRng::seed_from_u64(seeder.gen());
        let initial = kmeans_plus_plus(points, k, &mut rng);
        lloyd(points, initial, self.config.max_iter, tol)
    }
}

/// Spread the starting centroids: each new one is drawn with probability
/// proportional to its squared distance from the centroids chosen so far.
fn kmeans_plus_plus(points: &[Uiiv], k: usize, rng: &mut StdRng) -> Vec<Uiiv> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    while centroids.len() < k {
        let dists: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| (p - c).norm_squared())
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let total: f64 = dists.iter().sum();
        if total <= f64::EPSILON {
            // Every point coincides with a centroid
            centroids.push(points[rng.gen_range(0..n)]);
            continue;
        }

        let threshold = rng.gen_range(0.0..total);
        let mut cumulative = 0.0;
        let mut chosen = n - 1;
        for (i, d) in dists.iter().enumerate() {
            cumulative += d;
            if cumulative > threshold {
                chosen = i;
                break;
            }
        }
        centroids.push(points[chosen]);
    }

    centroids
}

pub(crate) fn lloyd(
    points: &[Uiiv],
    mut centroids: Vec<Uiiv>,
    max_iter: usize,
    tol: f64,
) -> KMeansModel {
    let k = centroids.len();
    let mut labels = vec![0usize; points.len()];
    let mut iterations = 0;

    for _ in 0..max_iter {
        iterations += 1;
        assign(points, &centroids, &mut labels);

        let mut sums = vec![Uiiv::zeros(); k];
        let mut counts = vec![0usize; k];
        for (point, &label) in points.iter().zip(&labels) {
            sums[label] += point;
            counts[label] += 1;
        }

        let mut shift = 0.0;
        for (c, (sum, count)) in sums.into_iter().zip(counts).enumerate() {
            // Empty groups keep their previous centroid
            if count > 0 {
                let updated = sum / count as f64;
                shift += (updated - centroids[c]).norm_squared();
                centroids[c] = updated;
            }
        }

        if shift <= tol {
            break;
        }
    }

    // Labels must agree with the final centroids
    assign(points, &centroids, &mut labels);
    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, &label)| (p - centroids[label]).norm_squared())
        .sum();

    KMeansModel {
        centroids,
        labels,
        inertia,
        iterations,
    }
}

fn assign(points: &[Uiiv], centroids: &[Uiiv], labels: &mut [usize]) {
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        *label = nearest_centroid(centroids, point);
    }
}

fn nearest_centroid(centroids: &[Uiiv], point: &Uiiv) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = (point - c).norm_squared();
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

fn mean_variance(points: &[Uiiv]) -> f64 {
    let n = points.len() as f64;
    let mean = points.iter().fold(Uiiv::zeros(), |acc, p| acc + p) / n;
    let variance = points
        .iter()
        .fold(Uiiv::zeros(), |acc, p| acc + (p - mean).component_mul(&(p - mean)))
        / n;
    variance.mean()
}
