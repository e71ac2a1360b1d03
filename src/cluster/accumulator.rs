//! Exact per-cluster channel sums.
//!
//! Channel bytes are summed as integers, so the mean of a cluster does not
//! depend on the order its colors were visited in. The convergence test
//! compares centroids with `==`, which relies on this.

use super::Centroid;
use crate::color::expand_bytes;

/// Running channel sums and member count for one cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Accumulator {
    sums: [u64; 4],
    weight: usize,
}

impl Accumulator {
    /// Adds one packed color to the cluster.
    #[inline]
    pub(crate) fn add(&mut self, color: u32) {
        for (sum, channel) in self.sums.iter_mut().zip(expand_bytes(color)) {
            *sum += u64::from(channel);
        }
        self.weight += 1;
    }

    /// Folds another partial sum for the same cluster into this one.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn merge(&mut self, other: &Self) {
        for (sum, part) in self.sums.iter_mut().zip(other.sums) {
            *sum += part;
        }
        self.weight += other.weight;
    }

    /// Elementwise mean. An empty cluster yields NaN channels.
    pub(crate) fn mean(&self) -> Centroid {
        let weight = self.weight as f64;
        Centroid {
            channels: self.sums.map(|sum| sum as f64 / weight),
            weight: self.weight,
            color: None,
        }
    }
}
