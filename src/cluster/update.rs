//! One Lloyd iteration: reseed empty clusters, reassign, re-average.

use super::accumulator::Accumulator;
use super::assign::nearest_centroid;
use super::Centroid;
use crate::color::expand;
use crate::traits::{ColorSource, IndexSampler};
use tracing::debug;

/// Colors per rayon task in [`update_centroids_par`].
#[cfg(feature = "parallel")]
pub const PARALLEL_CHUNK_LEN: usize = 4096;

/// Computes the next centroid list from `previous`.
///
/// Every centroid in `previous` with weight 0 is first moved, in place,
/// onto a dataset color chosen by `sampler` (one draw per empty centroid,
/// in index order). Each color is then assigned to its nearest repaired
/// centroid and the fresh centroids are the means of their members.
///
/// The weights of the returned list sum to `dataset.len()`. A centroid
/// that still receives no colors comes back with NaN channels.
///
/// # Examples
///
/// ```
/// use aprender_palette::cluster::{update_centroids, Centroid};
///
/// let colors = [0u32, 2, 10, 12];
/// let mut previous = vec![Centroid::new([0.0; 4], 2), Centroid::new([10.0, 0.0, 0.0, 0.0], 2)];
/// let next = update_centroids(&colors[..], &mut previous, &mut |_: usize| 0);
/// assert_eq!(next[0].channels[0], 1.0);
/// assert_eq!(next[1].channels[0], 11.0);
/// ```
pub fn update_centroids<D, S>(
    dataset: &D,
    previous: &mut [Centroid],
    sampler: &mut S,
) -> Vec<Centroid>
where
    D: ColorSource + ?Sized,
    S: IndexSampler + ?Sized,
{
    repair_empty(dataset, previous, sampler);
    let targets: &[Centroid] = previous;
    let sums = accumulate(dataset, targets, 0, dataset.len());
    sums.iter().map(Accumulator::mean).collect()
}

/// Parallel form of [`update_centroids`].
///
/// The assignment pass runs over chunks of [`PARALLEL_CHUNK_LEN`] colors.
/// Channel sums are integers, so the result is bit-identical to the serial
/// version whatever the scheduling.
#[cfg(feature = "parallel")]
pub fn update_centroids_par<D, S>(
    dataset: &D,
    previous: &mut [Centroid],
    sampler: &mut S,
) -> Vec<Centroid>
where
    D: ColorSource + Sync + ?Sized,
    S: IndexSampler + ?Sized,
{
    use rayon::prelude::*;

    repair_empty(dataset, previous, sampler);
    let targets: &[Centroid] = previous;
    let len = dataset.len();

    let partials: Vec<Vec<Accumulator>> = (0..len.div_ceil(PARALLEL_CHUNK_LEN))
        .into_par_iter()
        .map(|chunk| {
            let start = chunk * PARALLEL_CHUNK_LEN;
            let end = (start + PARALLEL_CHUNK_LEN).min(len);
            accumulate(dataset, targets, start, end)
        })
        .collect();

    let mut totals = vec![Accumulator::default(); targets.len()];
    for partial in &partials {
        for (total, part) in totals.iter_mut().zip(partial) {
            total.merge(part);
        }
    }
    totals.iter().map(Accumulator::mean).collect()
}

fn repair_empty<D, S>(dataset: &D, previous: &mut [Centroid], sampler: &mut S)
where
    D: ColorSource + ?Sized,
    S: IndexSampler + ?Sized,
{
    for (i, centroid) in previous.iter_mut().enumerate() {
        if centroid.weight == 0 {
            let index = sampler.sample_index(dataset.len());
            centroid.channels = expand(dataset.color_at(index));
            debug!(centroid = i, sample = index, "reseeded empty centroid");
        }
    }
}

fn accumulate<D>(dataset: &D, targets: &[Centroid], start: usize, end: usize) -> Vec<Accumulator>
where
    D: ColorSource + ?Sized,
{
    let mut sums = vec![Accumulator::default(); targets.len()];
    for index in start..end {
        let color = dataset.color_at(index);
        let nearest = nearest_centroid(targets, &expand(color));
        sums[nearest].add(color);
    }
    sums
}
