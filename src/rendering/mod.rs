// src/rendering/mod.rs
pub mod charts;
pub mod export;
pub mod painter;
pub mod primitives;
pub mod scene;

pub use export::{export_figure, Figure};
