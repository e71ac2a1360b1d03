//! K-Means palette clustering.
//!
//! Lloyd's algorithm over packed RGBA colors: centroids start as the means
//! of `k` contiguous chunks of the dataset, then every iteration assigns
//! each color to its nearest centroid and re-averages. The loop ends when
//! an iteration reproduces the previous centroids exactly, or at the
//! iteration cap.
//!
//! Two entry styles share the same loop:
//!
//! - [`cluster`] / [`cluster_with`]: one call, returns the centroids.
//! - [`ColorKMeans`]: builder-configured estimator with `fit`, `predict`
//!   and `quantize`.

mod accumulator;
mod assign;
mod convergence;
mod init;
mod update;

pub use assign::{nearest_centroid, nearest_centroid_with_distance};
pub use convergence::{centroids_equal, should_stop};
pub use init::initial_centroids;
pub use update::update_centroids;
#[cfg(feature = "parallel")]
pub use update::{update_centroids_par, PARALLEL_CHUNK_LEN};

use crate::color::{compress, distance_squared, expand, ColorVector};
use crate::error::{PaletteError, Result};
use crate::traits::{ColorSource, IndexSampler, RngSampler};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Iteration cap used when the caller does not pick one.
pub const DEFAULT_MAX_ITER: usize = 50;

/// One cluster of the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    /// Mean `[r, g, b, a]` of the member colors.
    #[serde(with = "channels_serde")]
    pub channels: ColorVector,
    /// Number of colors assigned in the iteration that produced this centroid.
    pub weight: usize,
    /// Packed representative color, set on finished results only.
    pub color: Option<u32>,
}

impl Centroid {
    /// Creates an unfinished centroid (no packed color yet).
    #[must_use]
    pub fn new(channels: ColorVector, weight: usize) -> Self {
        Self {
            channels,
            weight,
            color: None,
        }
    }

    /// Returns true if any channel is NaN or infinite, which happens when
    /// the cluster ended up with no colors.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.channels.iter().any(|c| !c.is_finite())
    }

    fn finished(self) -> Self {
        let color = compress(&self.channels);
        Self {
            color: Some(color),
            ..self
        }
    }
}

/// Non-finite channels (clusters that ended up empty) are written as
/// `null` and read back as NaN. Plain `f64` fields would serialize to
/// `null` in JSON but fail to deserialize.
mod channels_serde {
    use crate::color::ColorVector;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S>(channels: &ColorVector, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        channels
            .map(|c| c.is_finite().then_some(c))
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<ColorVector, D::Error>
    where
        D: Deserializer<'de>,
    {
        let channels = <[Option<f64>; 4]>::deserialize(deserializer)?;
        Ok(channels.map(|c| c.unwrap_or(f64::NAN)))
    }
}

/// Outcome of one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Final centroids with packed colors, in initialization order.
    pub centroids: Vec<Centroid>,
    /// Number of update steps performed.
    pub iterations: usize,
    /// True if the last update reproduced its input exactly.
    pub converged: bool,
}

/// Clusters `dataset` into `k` colors with the default iteration cap and
/// an entropy-seeded sampler for reseeding empty clusters.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidArgument`] if the dataset is empty or
/// `k` is not in `[1, dataset.len()]`.
///
/// # Examples
///
/// ```
/// use aprender_palette::prelude::*;
///
/// let pixels = [0x0000_0000u32, 0x0000_0000, 0xFFFF_FFFF, 0xFFFF_FFFF];
/// let palette = cluster(&pixels[..], 2).expect("valid k");
///
/// assert_eq!(palette[0].color, Some(0x0000_0000));
/// assert_eq!(palette[1].color, Some(0xFFFF_FFFF));
/// assert_eq!(palette[1].weight, 2);
/// ```
pub fn cluster<D>(dataset: &D, k: usize) -> Result<Vec<Centroid>>
where
    D: ColorSource + ?Sized,
{
    let mut sampler = RngSampler::from_entropy();
    cluster_with(dataset, k, DEFAULT_MAX_ITER, &mut sampler)
}

/// Clusters `dataset` into `k` colors with an explicit iteration cap and
/// sampler.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidArgument`] if the dataset is empty or
/// `k` is not in `[1, dataset.len()]`.
pub fn cluster_with<D, S>(
    dataset: &D,
    k: usize,
    max_iter: usize,
    sampler: &mut S,
) -> Result<Vec<Centroid>>
where
    D: ColorSource + ?Sized,
    S: IndexSampler + ?Sized,
{
    run(dataset, k, max_iter, sampler).map(|report| report.centroids)
}

/// Runs the clustering loop and reports iteration count and convergence.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidArgument`] if the dataset is empty or
/// `k` is not in `[1, dataset.len()]`.
pub fn run<D, S>(dataset: &D, k: usize, max_iter: usize, sampler: &mut S) -> Result<FitReport>
where
    D: ColorSource + ?Sized,
    S: IndexSampler + ?Sized,
{
    drive(dataset, k, max_iter, |previous| {
        update_centroids(dataset, previous, sampler)
    })
}

/// [`run`] with the assignment pass spread over the rayon pool.
///
/// Produces the same result as [`run`] for the same sampler sequence.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidArgument`] if the dataset is empty or
/// `k` is not in `[1, dataset.len()]`.
#[cfg(feature = "parallel")]
pub fn run_par<D, S>(dataset: &D, k: usize, max_iter: usize, sampler: &mut S) -> Result<FitReport>
where
    D: ColorSource + Sync + ?Sized,
    S: IndexSampler + ?Sized,
{
    drive(dataset, k, max_iter, |previous| {
        update_centroids_par(dataset, previous, sampler)
    })
}

fn validate(len: usize, k: usize) -> Result<()> {
    if len == 0 {
        return Err(PaletteError::empty_dataset());
    }
    if k == 0 || k > len {
        return Err(PaletteError::invalid_k(k, len));
    }
    Ok(())
}

fn drive<D, F>(dataset: &D, k: usize, max_iter: usize, mut step: F) -> Result<FitReport>
where
    D: ColorSource + ?Sized,
    F: FnMut(&mut [Centroid]) -> Vec<Centroid>,
{
    validate(dataset.len(), k)?;
    debug!(k, len = dataset.len(), max_iter, "clustering palette");

    let mut previous: Option<Vec<Centroid>> = None;
    let mut current = initial_centroids(dataset, k);
    let mut iteration = 0;

    while !should_stop(previous.as_deref(), &current, iteration, max_iter) {
        let mut prior = std::mem::take(&mut current);
        current = step(&mut prior);
        previous = Some(prior);
        iteration += 1;
        trace!(iteration, "centroids updated");
    }

    let converged = previous
        .as_deref()
        .is_some_and(|previous| centroids_equal(previous, &current));
    debug!(iterations = iteration, converged, "clustering finished");

    Ok(FitReport {
        centroids: current.into_iter().map(Centroid::finished).collect(),
        iterations: iteration,
        converged,
    })
}

/// K-Means palette estimator.
///
/// # Algorithm
///
/// 1. Split the colors into `k` contiguous chunks and take their means
/// 2. Move clusters that received no colors onto a random dataset color
/// 3. Assign each color to the nearest centroid (first one wins ties)
/// 4. Replace the centroids by the means of their members
/// 5. Repeat 2-4 until an iteration changes nothing, or `max_iter`
///
/// # Examples
///
/// ```
/// use aprender_palette::prelude::*;
///
/// let pixels = vec![0xFF00_0000u32, 0xFF00_0001, 0xFFFF_FFFE, 0xFFFF_FFFF];
///
/// let mut kmeans = ColorKMeans::new(2).with_random_state(42);
/// kmeans.fit(&pixels).expect("valid k");
///
/// assert!(kmeans.converged());
/// assert_eq!(kmeans.quantize(&pixels).expect("fitted").len(), 4);
/// assert_eq!(kmeans.predict(0xFF00_0000).expect("fitted"), 0);
/// ```
///
/// # Performance
///
/// - Time complexity: O(nki) where n=colors, k=clusters, i=iterations
/// - Space complexity: O(k)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorKMeans {
    /// Number of clusters.
    n_clusters: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Seed for the empty-cluster sampler.
    random_state: Option<u64>,
    /// Cluster centroids after fitting.
    centroids: Option<Vec<Centroid>>,
    /// Sum of squared distances to the assigned centroid.
    inertia: f64,
    /// Number of iterations run.
    n_iter: usize,
    /// Whether the last fit reached a fixed point.
    converged: bool,
}

impl Default for ColorKMeans {
    fn default() -> Self {
        Self::new(16)
    }
}

impl ColorKMeans {
    /// Creates an estimator producing `n_clusters` palette entries.
    #[must_use]
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: DEFAULT_MAX_ITER,
            random_state: None,
            centroids: None,
            inertia: 0.0,
            n_iter: 0,
            converged: false,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns the configured number of clusters.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Returns the configured iteration cap.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Returns the fitted centroids, or an empty slice before `fit`.
    #[must_use]
    pub fn centroids(&self) -> &[Centroid] {
        self.centroids.as_deref().unwrap_or_default()
    }

    /// Returns the packed palette colors in centroid order.
    #[must_use]
    pub fn palette(&self) -> Vec<u32> {
        self.centroids()
            .iter()
            .map(|c| c.color.unwrap_or_else(|| compress(&c.channels)))
            .collect()
    }

    /// Returns the inertia (within-cluster sum of squares) of the last fit.
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Returns the number of iterations run.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Returns true if the last fit stopped on a fixed point rather than
    /// the iteration cap.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted().is_ok()
    }

    /// Fits the palette, reseeding empty clusters from a sampler built
    /// from `random_state` (or from entropy when unset).
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty or has fewer colors than
    /// clusters.
    pub fn fit<D>(&mut self, dataset: &D) -> Result<()>
    where
        D: ColorSource + ?Sized,
    {
        let mut sampler = self.sampler();
        self.fit_with_sampler(dataset, &mut sampler)
    }

    /// Fits the palette with a caller-supplied sampler.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty or has fewer colors than
    /// clusters.
    pub fn fit_with_sampler<D, S>(&mut self, dataset: &D, sampler: &mut S) -> Result<()>
    where
        D: ColorSource + ?Sized,
        S: IndexSampler + ?Sized,
    {
        let report = run(dataset, self.n_clusters, self.max_iter, sampler)?;
        self.store(dataset, report);
        Ok(())
    }

    /// [`fit`](Self::fit) with the assignment pass on the rayon pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty or has fewer colors than
    /// clusters.
    #[cfg(feature = "parallel")]
    pub fn fit_par<D>(&mut self, dataset: &D) -> Result<()>
    where
        D: ColorSource + Sync + ?Sized,
    {
        let mut sampler = self.sampler();
        let report = run_par(dataset, self.n_clusters, self.max_iter, &mut sampler)?;
        self.store(dataset, report);
        Ok(())
    }

    /// Returns the index of the palette entry nearest to `color`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::NotFitted`] before `fit`.
    pub fn predict(&self, color: u32) -> Result<usize> {
        let centroids = self.fitted()?;
        Ok(nearest_centroid(centroids, &expand(color)))
    }

    /// Replaces every color of `dataset` with its nearest palette color.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::NotFitted`] before `fit`.
    pub fn quantize<D>(&self, dataset: &D) -> Result<Vec<u32>>
    where
        D: ColorSource + ?Sized,
    {
        let centroids = self.fitted()?;
        let palette = self.palette();
        Ok((0..dataset.len())
            .map(|i| palette[nearest_centroid(centroids, &expand(dataset.color_at(i)))])
            .collect())
    }

    // A deserialized estimator may carry an empty centroid list.
    fn fitted(&self) -> Result<&[Centroid]> {
        match self.centroids.as_deref() {
            Some(centroids) if !centroids.is_empty() => Ok(centroids),
            _ => Err(PaletteError::NotFitted),
        }
    }

    fn sampler(&self) -> RngSampler<rand::rngs::StdRng> {
        match self.random_state {
            Some(seed) => RngSampler::seeded(seed),
            None => RngSampler::from_entropy(),
        }
    }

    fn store<D>(&mut self, dataset: &D, report: FitReport)
    where
        D: ColorSource + ?Sized,
    {
        self.inertia = inertia(dataset, &report.centroids);
        self.n_iter = report.iterations;
        self.converged = report.converged;
        self.centroids = Some(report.centroids);
    }
}

/// Sum over all colors of the squared distance to the nearest centroid.
///
/// Degenerate (NaN) centroids are skipped by the nearest search, so they
/// do not poison the total.
#[must_use]
pub fn inertia<D>(dataset: &D, centroids: &[Centroid]) -> f64
where
    D: ColorSource + ?Sized,
{
    (0..dataset.len())
        .map(|i| {
            let color = expand(dataset.color_at(i));
            let (nearest, _) = nearest_centroid_with_distance(centroids, &color);
            centroids
                .get(nearest)
                .map_or(0.0, |c| distance_squared(&c.channels, &color))
        })
        .sum()
}


#[cfg(test)]
#[path = "tests_kmeans_contract.rs"]
mod tests_kmeans_contract;
