use crate::canvas::Canvas;
use crate::nails::{Nail, NailLayout};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

mod darkness;
mod squared_error;

#[doc(inline)]
pub use darkness::DarknessSum;
#[doc(inline)]
pub use squared_error::SquaredError;

/// The winning candidate of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestCandidate {
    pub nail_idx: usize,
    pub score: f32,
}

/// Closed set of strategies ranking candidate thread segments.
///
/// Both answer: how much does drawing a segment from the current nail improve
/// the approximation of the target by the working canvas? The candidate
/// universe, tie-break rule and acceptance threshold differ per variant and
/// are documented on the variant types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Strategy {
    SquaredError(SquaredError),
    DarknessSum(DarknessSum),
}

impl Strategy {
    /// Evaluates all legal candidate segments from `current` and returns the
    /// winner under the variant's tie-break rule, or `None` if no candidate is legal.
    pub fn best_from(
        &self,
        current: usize,
        layout: &NailLayout,
        canvas: &Canvas,
        target: &Canvas,
        rng: &mut SmallRng,
    ) -> Option<BestCandidate> {
        match self {
            Strategy::SquaredError(s) => s.best_from(current, layout, canvas, target, rng),
            Strategy::DarknessSum(s) => s.best_from(current, layout, canvas),
        }
    }

    /// Whether a winning score clears the variant's acceptance threshold.
    pub fn accepts(&self, score: f32) -> bool {
        match self {
            Strategy::SquaredError(_) => score > 0.0,
            Strategy::DarknessSum(_) => true,
        }
    }

    /// Mutates the working canvas with the segment `from -> to`.
    pub fn apply(&self, canvas: &mut Canvas, from: Nail, to: Nail) {
        match self {
            Strategy::SquaredError(s) => s.apply(canvas, from, to),
            Strategy::DarknessSum(s) => s.apply(canvas, from, to),
        }
    }
}
