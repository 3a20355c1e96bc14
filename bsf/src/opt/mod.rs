use stringart_rs::builder::InitPolicy;
use stringart_rs::canvas::Canvas;
use stringart_rs::score::Strategy;

pub mod bsf_color;
pub mod bsf_gray;

use anyhow::Result;

/// The initialization policy each strategy was designed around:
/// squared-error probes the neighbors of the handover nail for the better
/// thread origin, darkness-sum starts exactly at it.
pub fn default_init(strategy: &Strategy, start_idx: usize) -> InitPolicy {
    match strategy {
        Strategy::SquaredError(_) => InitPolicy::AdjacentSeek { near: start_idx },
        Strategy::DarknessSum(_) => InitPolicy::Fixed { at: start_idx },
    }
}

/// The working canvas the strategy expects: a blank background to accumulate
/// strokes on for squared-error, a fading copy of the target for darkness-sum.
pub fn working_canvas(
    strategy: &Strategy,
    target: &Canvas,
    dark_background: bool,
) -> Result<Canvas> {
    match strategy {
        Strategy::SquaredError(_) => match dark_background {
            true => Canvas::black(target.shape()),
            false => Canvas::white(target.shape()),
        },
        Strategy::DarknessSum(_) => Ok(target.clone()),
    }
}
