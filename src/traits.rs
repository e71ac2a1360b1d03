//! Seams between the clustering loop and its collaborators.
//!
//! The color data and the randomness used to reseed empty clusters are
//! both injected, so callers can cluster any indexed pixel store and tests
//! can replay exact random sequences.

use rand::Rng;

/// Read-only random access to a sequence of packed colors.
///
/// # Examples
///
/// ```
/// use aprender_palette::prelude::*;
///
/// let pixels = vec![0xFF00_0000u32, 0xFFFF_FFFF];
/// assert_eq!(ColorSource::len(&pixels), 2);
/// assert_eq!(pixels.color_at(1), 0xFFFF_FFFF);
/// ```
pub trait ColorSource {
    /// Number of colors in the sequence.
    fn len(&self) -> usize;

    /// Returns the packed color at `index`, for `index < len()`.
    fn color_at(&self, index: usize) -> u32;

    /// Returns true if the sequence holds no colors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ColorSource for [u32] {
    fn len(&self) -> usize {
        <[u32]>::len(self)
    }

    fn color_at(&self, index: usize) -> u32 {
        self[index]
    }
}

impl<const N: usize> ColorSource for [u32; N] {
    fn len(&self) -> usize {
        N
    }

    fn color_at(&self, index: usize) -> u32 {
        self[index]
    }
}

impl ColorSource for Vec<u32> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn color_at(&self, index: usize) -> u32 {
        self[index]
    }
}

impl<T: ColorSource + ?Sized> ColorSource for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn color_at(&self, index: usize) -> u32 {
        (**self).color_at(index)
    }
}

/// Source of dataset indices for reseeding clusters that lost all colors.
pub trait IndexSampler {
    /// Returns an index in `[0, len)`. Called only with `len >= 1`.
    fn sample_index(&mut self, len: usize) -> usize;
}

impl<F: FnMut(usize) -> usize> IndexSampler for F {
    fn sample_index(&mut self, len: usize) -> usize {
        self(len)
    }
}

/// Uniform index sampler backed by any [`rand::Rng`].
///
/// # Examples
///
/// ```
/// use aprender_palette::traits::{IndexSampler, RngSampler};
///
/// let mut sampler = RngSampler::seeded(7);
/// assert!(sampler.sample_index(10) < 10);
/// ```
#[derive(Debug, Clone)]
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    /// Wraps an existing generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSampler<rand::rngs::StdRng> {
    /// Deterministic sampler for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self::new(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        use rand::SeedableRng;
        Self::new(rand::rngs::StdRng::from_entropy())
    }
}

impl<R: Rng> IndexSampler for RngSampler<R> {
    fn sample_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
