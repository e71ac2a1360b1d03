//! Aprender Palette: color palette reduction via k-means in pure Rust.
//!
//! Clusters a read-only sequence of packed RGBA colors into `k`
//! representative colors. Each result carries the mean channel values of
//! its cluster, the number of colors assigned to it and the mean re-packed
//! as a color.
//!
//! # Quick Start
//!
//! ```
//! use aprender_palette::prelude::*;
//!
//! // Four pixels: two black, two white (R is the low byte)
//! let pixels = vec![0x0000_0000u32, 0x0000_0000, 0xFFFF_FFFF, 0xFFFF_FFFF];
//!
//! let palette = cluster(&pixels, 2).unwrap();
//! assert_eq!(palette.len(), 2);
//! assert_eq!(palette[0].channels, [0.0; 4]);
//! assert_eq!(palette[1].color, Some(0xFFFF_FFFF));
//! ```
//!
//! # Modules
//!
//! - [`color`]: Packed color expansion and compression
//! - [`cluster`]: K-Means palette clustering
//! - [`traits`]: Color source and random index sampler seams
//! - [`error`]: Error types
//!
//! # Features
//!
//! - `parallel`: assignment pass on the rayon thread pool
//!   (`run_par`, `ColorKMeans::fit_par`), bit-identical to the serial path

pub mod cluster;
pub mod color;
pub mod error;
pub mod prelude;
pub mod traits;

pub use error::{PaletteError, Result};
pub use traits::{ColorSource, IndexSampler};
