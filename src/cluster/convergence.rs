//! Stop condition for the clustering loop.

use super::Centroid;

/// Decides whether the loop should stop before running another update.
///
/// The iteration cap is checked first and wins regardless of centroid
/// state. Without a previous list (before the first update) the loop
/// continues. Otherwise it stops once [`centroids_equal`] holds.
///
/// # Examples
///
/// ```
/// use aprender_palette::cluster::{should_stop, Centroid};
///
/// let a = vec![Centroid::new([1.0; 4], 3)];
/// assert!(!should_stop(None, &a, 0, 50));
/// assert!(should_stop(Some(&a[..]), &a, 1, 50));
/// assert!(should_stop(None, &a, 50, 50));
/// ```
#[must_use]
pub fn should_stop(
    previous: Option<&[Centroid]>,
    current: &[Centroid],
    iteration: usize,
    max_iter: usize,
) -> bool {
    if iteration >= max_iter {
        return true;
    }

    match previous {
        None => false,
        Some(previous) => centroids_equal(previous, current),
    }
}

/// True when every centroid in `current` has exactly the same channels as
/// the centroid at the same index in `previous`.
///
/// There is no tolerance, weights are ignored, and NaN channels never
/// compare equal.
#[must_use]
pub fn centroids_equal(previous: &[Centroid], current: &[Centroid]) -> bool {
    previous.len() == current.len()
        && current
            .iter()
            .zip(previous)
            .all(|(c, p)| c.channels == p.channels)
}
