use crate::canvas::Canvas;
use crate::nails::Nail;
use crate::raster::aa_line;
use anyhow::{Result, ensure};
use itertools::Itertools;
use ndarray::Array3;

/// Unit tints for a red/green/blue three-channel replay.
pub const RGB_TINTS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Rescales nail positions from a source canvas shape to an output shape.
/// Each coordinate is scaled by the output-to-source ratio of its axis and
/// truncated back to integer pixel coordinates.
pub fn scale_nails(
    nails: &[Nail],
    from_shape: (usize, usize),
    to_shape: (usize, usize),
) -> Result<Vec<Nail>> {
    ensure!(
        from_shape.0 > 0 && from_shape.1 > 0 && to_shape.0 > 0 && to_shape.1 > 0,
        "cannot rescale nails between shapes {from_shape:?} and {to_shape:?}"
    );
    let r_ratio = to_shape.0 as f32 / from_shape.0 as f32;
    let c_ratio = to_shape.1 as f32 / from_shape.1 as f32;
    Ok(nails
        .iter()
        .map(|n| {
            Nail(
                (n.row() as f32 * r_ratio) as u32,
                (n.col() as f32 * c_ratio) as u32,
            )
        })
        .collect_vec())
}

/// Replays a pull order onto a fresh grayscale canvas of the given shape.
///
/// Every consecutive pair of entries is drawn as one anti-aliased segment,
/// accumulating `strength` times the coverage weight and clamping after every
/// accumulation. The background is black for a positive (lightening) strength
/// and white for a negative (darkening) one. Deterministic: identical inputs
/// produce an identical canvas.
pub fn render_grayscale(
    pull_order: &[usize],
    nails: &[Nail],
    shape: (usize, usize),
    strength: f32,
) -> Result<Canvas> {
    check_compatible(&[pull_order], nails, shape)?;

    let mut canvas = match strength >= 0.0 {
        true => Canvas::black(shape)?,
        false => Canvas::white(shape)?,
    };
    for pair in pull_order.windows(2) {
        for (r, c, coverage) in aa_line(nails[pair[0]], nails[pair[1]], shape) {
            canvas.blend(r, c, strength * coverage);
        }
    }
    Ok(canvas)
}

/// Replays three single-channel pull orders onto one colored canvas.
///
/// The orders are drawn in lock-step rounds (one segment per channel per
/// round) so threads of different colors interleave instead of stacking as
/// three solid passes. Shorter orders are padded by repeating their final
/// nail index. Each channel accumulates its tint scaled by coverage and
/// `strength`, clamping after every accumulation.
pub fn render_color(
    pull_orders: &[Vec<usize>; 3],
    nails: &[Nail],
    shape: (usize, usize),
    tints: [[f32; 3]; 3],
    strength: f32,
) -> Result<Array3<f32>> {
    ensure!(
        pull_orders.iter().all(|o| !o.is_empty()),
        "color interleave requires three non-empty pull orders"
    );
    let orders: [&[usize]; 3] = [&pull_orders[0], &pull_orders[1], &pull_orders[2]];
    check_compatible(&orders, nails, shape)?;

    let rounds = pull_orders.iter().map(|o| o.len()).max().unwrap() - 1;
    let padded = pull_orders.clone().map(|mut order| {
        let last = *order.last().unwrap();
        order.resize(rounds + 1, last);
        order
    });

    let background = if strength >= 0.0 { 0.0 } else { 1.0 };
    let mut canvas = Array3::from_elem((shape.0, shape.1, 3), background);

    for round in 0..rounds {
        for (channel, order) in padded.iter().enumerate() {
            let (from, to) = (nails[order[round]], nails[order[round + 1]]);
            for (r, c, coverage) in aa_line(from, to, shape) {
                for (k, tint) in tints[channel].iter().enumerate() {
                    let v = &mut canvas[[r, c, k]];
                    *v = (*v + tint * coverage * strength).clamp(0.0, 1.0);
                }
            }
        }
    }
    Ok(canvas)
}

/// Pull orders, nails and output shape must agree before any replay starts.
fn check_compatible(pull_orders: &[&[usize]], nails: &[Nail], shape: (usize, usize)) -> Result<()> {
    ensure!(
        shape.0 > 0 && shape.1 > 0,
        "output canvas must have positive extent in both dimensions, got {shape:?}"
    );
    for nail in nails {
        ensure!(
            (nail.row() as usize) < shape.0 && (nail.col() as usize) < shape.1,
            "nail {nail} lies outside the {shape:?} output canvas, rescale the layout first"
        );
    }
    for order in pull_orders {
        for &idx in *order {
            ensure!(
                idx < nails.len(),
                "pull order references nail {idx}, but the layout only has {} nails",
                nails.len()
            );
        }
    }
    Ok(())
}
