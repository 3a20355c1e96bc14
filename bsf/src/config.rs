use serde::{Deserialize, Serialize};

use stringart_rs::builder::Limits;
use stringart_rs::nails::LayoutConfig;
use stringart_rs::score::{SquaredError, Strategy};

/// Configuration for the BSF reference implementation
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct BSFConfig {
    /// Nail layout generated on the working canvas
    pub layout: LayoutConfig,
    /// Active scoring strategy. The sign of a stroke strength should match
    /// `dark_background`: negative strengths darken a light background.
    pub strategy: Strategy,
    /// Iteration limits of the greedy loop
    pub limits: Limits,
    /// Side length of the square working canvas the greedy search runs at
    pub working_side: usize,
    /// Side length of the square canvas the final render is replayed at
    pub export_side: usize,
    /// Accumulation strength magnitude used for the export replay
    pub export_strength: f32,
    /// Light threads on a black background instead of dark threads on white
    pub dark_background: bool,
    /// Approximate each RGB channel separately and interleave the three renders
    pub color: bool,
    /// Seed for the PRNG. If undefined, the algorithm will run in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
}

impl Default for BSFConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::Rectangle { nail_step: 10 },
            strategy: Strategy::SquaredError(SquaredError {
                strength: -0.05,
                subsample: None,
            }),
            limits: Limits {
                max_steps: None,
                failure_cap: Some(3),
            },
            working_side: 300,
            export_side: 800,
            export_strength: 0.18,
            dark_background: false,
            color: false,
            prng_seed: Some(0),
        }
    }
}
