// src/analysis/mod.rs
pub mod colormap;
pub mod stats;

pub use colormap::{Colormap, Rgb, DEFAULT_COLORMAP};
