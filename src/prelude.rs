//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use aprender_palette::prelude::*;
//! ```

pub use crate::cluster::{
    cluster, cluster_with, run, Centroid, ColorKMeans, FitReport, DEFAULT_MAX_ITER,
};
pub use crate::color::{compress, expand, ColorVector};
pub use crate::error::PaletteError;
pub use crate::traits::{ColorSource, IndexSampler, RngSampler};
