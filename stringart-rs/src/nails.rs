use anyhow::{Result, ensure};
use itertools::Itertools;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A nail position on the canvas, as integer (row, col) pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub struct Nail(pub u32, pub u32);

impl Nail {
    pub fn row(&self) -> u32 {
        self.0
    }

    pub fn col(&self) -> u32 {
        self.1
    }

    pub fn distance(&self, other: &Nail) -> f32 {
        self.sq_distance(other).sqrt()
    }

    pub fn sq_distance(&self, other: &Nail) -> f32 {
        let dr = self.0 as f32 - other.0 as f32;
        let dc = self.1 as f32 - other.1 as f32;
        dr.powi(2) + dc.powi(2)
    }
}

impl Display for Nail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Which boundary layout to generate the nails on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LayoutConfig {
    /// Nails along all four edges of the canvas, every `nail_step` pixels.
    Rectangle { nail_step: usize },
    /// Nails on an ellipse perimeter centered on the canvas, with the base
    /// radius `min(h, w) / 2 - 1` scaled per axis, subsampled every `nail_step` points.
    Ellipse {
        nail_step: usize,
        r1_multiplier: f32,
        r2_multiplier: f32,
    },
}

/// The immutable ordered set of nail positions for one canvas shape.
///
/// Ordering is significant: rectangle nails follow a perimeter walk
/// (top, right, bottom, left), elliptical nails are ordered by polar angle
/// around the centroid. Every position is unique and within bounds.
#[derive(Debug, Clone)]
pub struct NailLayout {
    pub nails: Vec<Nail>,
    pub shape: (usize, usize),
}

impl NailLayout {
    pub fn new(shape: (usize, usize), config: LayoutConfig) -> Result<Self> {
        match config {
            LayoutConfig::Rectangle { nail_step } => Self::rectangle(shape, nail_step),
            LayoutConfig::Ellipse {
                nail_step,
                r1_multiplier,
                r2_multiplier,
            } => Self::ellipse(shape, nail_step, r1_multiplier, r2_multiplier),
        }
    }

    /// Nails along the four edges: top edge left to right, right edge top to
    /// bottom, bottom edge left to right, left edge top to bottom.
    /// The vertical edges only use interior rows, so corners are never duplicated.
    pub fn rectangle(shape: (usize, usize), nail_step: usize) -> Result<Self> {
        let (height, width) = validated_dims(shape, nail_step)?;

        let top = (0..width).step_by(nail_step).map(|c| Nail(0, c as u32));
        let right = (1..height - 1)
            .step_by(nail_step)
            .map(|r| Nail(r as u32, (width - 1) as u32));
        let bottom = (0..width)
            .step_by(nail_step)
            .map(|c| Nail((height - 1) as u32, c as u32));
        let left = (1..height - 1).step_by(nail_step).map(|r| Nail(r as u32, 0));

        let nails = top.chain(right).chain(bottom).chain(left).collect_vec();

        Ok(NailLayout { nails, shape })
    }

    /// Nails on the perimeter of an ellipse centered on the canvas.
    ///
    /// The perimeter pixels are deduplicated, sorted by polar angle around the
    /// centroid (ascending) and subsampled by taking every `nail_step`-th point.
    /// Perimeter pixels pushed outside the canvas by a radius multiplier > 1 are dropped.
    pub fn ellipse(
        shape: (usize, usize),
        nail_step: usize,
        r1_multiplier: f32,
        r2_multiplier: f32,
    ) -> Result<Self> {
        let (height, width) = validated_dims(shape, nail_step)?;

        let center = ((height / 2) as i64, (width / 2) as i64);
        let radius = (usize::min(height, width) / 2).saturating_sub(1) as f32;
        let r_radius = (radius * r1_multiplier) as i64;
        let c_radius = (radius * r2_multiplier) as i64;
        ensure!(
            r_radius >= 1 && c_radius >= 1,
            "ellipse layout degenerate for shape {shape:?} with multipliers ({r1_multiplier}, {r2_multiplier})"
        );

        let in_bounds =
            |&(r, c): &(i64, i64)| r >= 0 && c >= 0 && r < height as i64 && c < width as i64;

        let nails = ellipse_perimeter(center, r_radius, c_radius)
            .into_iter()
            .filter(in_bounds)
            .unique()
            .sorted_by_key(|&(r, c)| {
                let angle = ((r - center.0) as f32).atan2((c - center.1) as f32);
                (NotNan::new(angle).unwrap(), r, c)
            })
            .step_by(nail_step)
            .map(|(r, c)| Nail(r as u32, c as u32))
            .collect_vec();

        Ok(NailLayout { nails, shape })
    }

    pub fn len(&self) -> usize {
        self.nails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nails.is_empty()
    }

    pub fn position(&self, idx: usize) -> Nail {
        self.nails[idx]
    }
}

fn validated_dims(shape: (usize, usize), nail_step: usize) -> Result<(usize, usize)> {
    ensure!(nail_step > 0, "nail step must be positive, got {nail_step}");
    ensure!(
        shape.0 > 0 && shape.1 > 0,
        "canvas must have positive extent in both dimensions, got {shape:?}"
    );
    Ok(shape)
}

/// All pixels on the perimeter of the ellipse centered at `center` with the
/// given per-axis radii, via the midpoint ellipse algorithm.
/// Unordered and containing the 4-way symmetric duplicates on the axes.
fn ellipse_perimeter(center: (i64, i64), r_radius: i64, c_radius: i64) -> Vec<(i64, i64)> {
    let (cr, cc) = center;
    let (a, b) = (c_radius, r_radius); // a along columns, b along rows
    let (a2, b2) = (a * a, b * b);

    let mut pixels = Vec::with_capacity(4 * (a + b) as usize);
    let mut plot = |x: i64, y: i64| {
        pixels.push((cr + y, cc + x));
        pixels.push((cr + y, cc - x));
        pixels.push((cr - y, cc + x));
        pixels.push((cr - y, cc - x));
    };

    let (mut x, mut y) = (0i64, b);

    // region 1: |slope| < 1, step along the columns
    // decision variables scaled by 4 to stay in integer arithmetic
    let mut d1 = 4 * b2 - 4 * a2 * b + a2;
    while b2 * x <= a2 * y {
        plot(x, y);
        if d1 < 0 {
            d1 += 4 * b2 * (2 * x + 3);
        } else {
            d1 += 4 * (b2 * (2 * x + 3) + a2 * (2 - 2 * y));
            y -= 1;
        }
        x += 1;
    }

    // region 2: |slope| >= 1, step along the rows
    let mut d2 = b2 * (2 * x + 1).pow(2) + 4 * a2 * (y - 1).pow(2) - 4 * a2 * b2;
    while y >= 0 {
        plot(x, y);
        if d2 > 0 {
            d2 += 4 * a2 * (3 - 2 * y);
        } else {
            d2 += 4 * (b2 * (2 * x + 2) + a2 * (3 - 2 * y));
            x += 1;
        }
        y -= 1;
    }

    pixels
}
