use anyhow::{Result, ensure};
use ndarray::Array2;

/// A grayscale raster buffer with intensities in `[0.0, 1.0]` (1.0 = white).
///
/// Used both for the immutable target image and for the mutable working canvas
/// of a greedy run. Every mutation clamps back into the valid range.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    pub pixels: Array2<f32>,
}

impl Canvas {
    /// Creates a uniformly filled canvas. `value` is clamped to `[0, 1]`.
    pub fn filled(shape: (usize, usize), value: f32) -> Result<Self> {
        ensure!(
            shape.0 > 0 && shape.1 > 0,
            "canvas must have positive extent in both dimensions, got {shape:?}"
        );
        Ok(Canvas {
            pixels: Array2::from_elem(shape, value.clamp(0.0, 1.0)),
        })
    }

    /// An all-white canvas, the usual background for dark threads.
    pub fn white(shape: (usize, usize)) -> Result<Self> {
        Canvas::filled(shape, 1.0)
    }

    /// An all-black canvas, the background for light threads.
    pub fn black(shape: (usize, usize)) -> Result<Self> {
        Canvas::filled(shape, 0.0)
    }

    /// Wraps an existing intensity grid, clamping all values into `[0, 1]`.
    pub fn from_pixels(mut pixels: Array2<f32>) -> Result<Self> {
        ensure!(
            pixels.nrows() > 0 && pixels.ncols() > 0,
            "canvas must have positive extent in both dimensions, got ({}, {})",
            pixels.nrows(),
            pixels.ncols()
        );
        pixels.mapv_inplace(|v| v.clamp(0.0, 1.0));
        Ok(Canvas { pixels })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.pixels.nrows(), self.pixels.ncols())
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.pixels[[row, col]]
    }

    /// Adds `delta` to the pixel at `(row, col)`, clamping the result to `[0, 1]`.
    #[inline(always)]
    pub fn blend(&mut self, row: usize, col: usize, delta: f32) {
        let v = &mut self.pixels[[row, col]];
        *v = (*v + delta).clamp(0.0, 1.0);
    }
}
