use crate::canvas::Canvas;
use crate::nails::{Nail, NailLayout};
use crate::raster::walk_line;
use crate::score::BestCandidate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Normalized darkness-sum scoring.
///
/// A candidate segment is walked pixel by pixel (binary rasterization) and
/// scored by the summed darkness (1 − intensity) of the pixels it covers,
/// divided by the Euclidean length of the segment. The normalization removes
/// the bias toward very short high-density segments.
///
/// The candidate universe excludes the current nail and any nail closer than
/// `min_distance`; there is no adjacency exclusion. Ties are resolved
/// first-wins: the first candidate scanned with the best score keeps it.
/// Every winning candidate is accepted, improving or not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DarknessSum {
    /// Minimum Euclidean distance (pixels) between consecutive nails.
    pub min_distance: f32,
    /// Intensity added to every covered pixel of the working canvas after a
    /// pull, fading drawn regions so later threads route elsewhere.
    pub fade: f32,
}

impl DarknessSum {
    pub fn score_segment(&self, canvas: &Canvas, from: Nail, to: Nail) -> f32 {
        let darkness: f32 = walk_line(from, to, canvas.shape())
            .iter()
            .map(|&(r, c)| 1.0 - canvas.get(r, c))
            .sum();
        darkness / from.distance(&to).max(1.0)
    }

    pub fn best_from(
        &self,
        current: usize,
        layout: &NailLayout,
        canvas: &Canvas,
    ) -> Option<BestCandidate> {
        let from = layout.position(current);
        let candidates: Vec<usize> = (0..layout.len())
            .filter(|&i| i != current && from.distance(&layout.position(i)) >= self.min_distance)
            .collect();

        let scores: Vec<f32> = candidates
            .par_iter()
            .map(|&i| self.score_segment(canvas, from, layout.position(i)))
            .collect();

        let mut best: Option<BestCandidate> = None;
        for (&nail_idx, &score) in candidates.iter().zip(&scores) {
            if best.is_none_or(|b| score > b.score) {
                best = Some(BestCandidate { nail_idx, score });
            }
        }
        best
    }

    pub fn apply(&self, canvas: &mut Canvas, from: Nail, to: Nail) {
        for (r, c) in walk_line(from, to, canvas.shape()) {
            canvas.blend(r, c, self.fade);
        }
    }
}
