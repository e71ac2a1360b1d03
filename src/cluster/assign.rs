//! Nearest-centroid lookup.

use super::Centroid;
use crate::color::{distance_squared, ColorVector};

/// Returns the index of the centroid closest to `color`.
///
/// Ties go to the lowest index: the best index only moves on a strict
/// improvement. Returns 0 if `centroids` is empty or every distance is NaN.
///
/// # Examples
///
/// ```
/// use aprender_palette::cluster::{nearest_centroid, Centroid};
///
/// let centroids = [
///     Centroid::new([0.0; 4], 1),
///     Centroid::new([255.0; 4], 1),
/// ];
/// assert_eq!(nearest_centroid(&centroids, &[200.0, 200.0, 200.0, 200.0]), 1);
/// ```
#[inline]
#[must_use]
pub fn nearest_centroid(centroids: &[Centroid], color: &ColorVector) -> usize {
    nearest_centroid_with_distance(centroids, color).0
}

/// Like [`nearest_centroid`], also returning the squared distance to the
/// winner (`f64::INFINITY` when nothing was selected).
#[must_use]
pub fn nearest_centroid_with_distance(centroids: &[Centroid], color: &ColorVector) -> (usize, f64) {
    let mut best = 0;
    let mut min_dist = f64::INFINITY;

    for (i, centroid) in centroids.iter().enumerate() {
        let dist = distance_squared(&centroid.channels, color);
        if dist < min_dist {
            min_dist = dist;
            best = i;
        }
    }

    (best, min_dist)
}
