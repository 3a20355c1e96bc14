//! A greedy nail-and-thread approximation engine for grayscale raster images.
//!
//! Given a target image and a fixed set of nail positions along the canvas
//! boundary, the engine computes an ordered sequence of nail indices (a *pull
//! order*) such that drawing one straight thread segment per consecutive pair
//! visually reconstructs the target. The pull order fully determines the final
//! render and can be replayed at any output resolution.

/// Raster buffers holding intensities in `[0.0, 1.0]`
pub mod canvas;

/// Nail (anchor) position layouts along the canvas boundary
pub mod nails;

/// Line rasterization, anti-aliased and binary
pub mod raster;

/// Scoring strategies ranking candidate thread segments
pub mod score;

/// The greedy loop building a pull order against a working canvas
pub mod builder;

/// Replaying finished pull orders onto output canvases
pub mod render;
