//! Starting centroids from a contiguous partition of the dataset.

use super::accumulator::Accumulator;
use super::Centroid;
use crate::traits::ColorSource;

/// Splits the dataset into `k` contiguous chunks and returns each chunk's
/// mean, in chunk order.
///
/// Chunks hold `len / k` colors each; the last one also takes the
/// remainder. Every centroid's weight is its chunk length.
///
/// # Panics
///
/// Panics if `k == 0`. With `k > len` the leading chunks are empty and
/// their centroids are NaN.
///
/// # Examples
///
/// ```
/// use aprender_palette::cluster::initial_centroids;
///
/// let colors = [0u32, 2, 4, 6, 8];
/// let centroids = initial_centroids(&colors[..], 2);
/// assert_eq!(centroids[0].channels[0], 1.0);
/// assert_eq!(centroids[1].channels[0], 6.0);
/// assert_eq!(centroids[1].weight, 3);
/// ```
#[must_use]
pub fn initial_centroids<D>(dataset: &D, k: usize) -> Vec<Centroid>
where
    D: ColorSource + ?Sized,
{
    let len = dataset.len();
    let chunk_size = len / k;

    (0..k)
        .map(|i| {
            let start = i * chunk_size;
            let end = if i + 1 == k { len } else { start + chunk_size };

            let mut acc = Accumulator::default();
            for index in start..end {
                acc.add(dataset.color_at(index));
            }
            acc.mean()
        })
        .collect()
}
