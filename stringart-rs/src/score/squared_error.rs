use crate::canvas::Canvas;
use crate::nails::{Nail, NailLayout};
use crate::raster::aa_line;
use crate::score::BestCandidate;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Squared-error improvement scoring.
///
/// A candidate segment is rasterized anti-aliased and scored by how much
/// blending it into the working canvas would reduce the total squared error
/// against the target: Σ (old − target)² − (new − target)², with the new value
/// clamped to the valid intensity range. Positive means improvement.
///
/// The candidate universe excludes the current nail and its two immediate
/// neighbors in the layout ordering (no near-zero-length segments), optionally
/// restricted to a random subsample. Ties are resolved last-wins: the last
/// candidate scanned with a score equal to the running best replaces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SquaredError {
    /// Signed intensity contribution of one thread pass on the working canvas.
    /// Negative darkens (light background), positive lightens (dark background).
    pub strength: f32,
    /// If set, only a random subsample of this many nails is evaluated per pass.
    pub subsample: Option<usize>,
}

impl SquaredError {
    pub fn score_segment(&self, canvas: &Canvas, target: &Canvas, from: Nail, to: Nail) -> f32 {
        aa_line(from, to, canvas.shape())
            .iter()
            .map(|&(r, c, coverage)| {
                let old = canvas.get(r, c);
                let new = (old + self.strength * coverage).clamp(0.0, 1.0);
                let t = target.get(r, c);
                (old - t).powi(2) - (new - t).powi(2)
            })
            .sum()
    }

    pub fn best_from(
        &self,
        current: usize,
        layout: &NailLayout,
        canvas: &Canvas,
        target: &Canvas,
        rng: &mut SmallRng,
    ) -> Option<BestCandidate> {
        // neighbor exclusion does not wrap around the layout ends
        let excluded = |i: usize| i == current || i + 1 == current || i == current + 1;
        let candidates: Vec<usize> = match self.subsample {
            Some(k) => rand::seq::index::sample(rng, layout.len(), k.min(layout.len()))
                .into_iter()
                .filter(|&i| !excluded(i))
                .collect(),
            None => (0..layout.len()).filter(|&i| !excluded(i)).collect(),
        };

        let from = layout.position(current);
        // scores are gathered in scan order so the reduction below stays
        // deterministic regardless of rayon's work splitting
        let scores: Vec<f32> = candidates
            .par_iter()
            .map(|&i| self.score_segment(canvas, target, from, layout.position(i)))
            .collect();

        let mut best: Option<BestCandidate> = None;
        for (&nail_idx, &score) in candidates.iter().zip(&scores) {
            if best.is_none_or(|b| score >= b.score) {
                best = Some(BestCandidate { nail_idx, score });
            }
        }
        best
    }

    pub fn apply(&self, canvas: &mut Canvas, from: Nail, to: Nail) {
        for (r, c, coverage) in aa_line(from, to, canvas.shape()) {
            canvas.blend(r, c, self.strength * coverage);
        }
    }
}
