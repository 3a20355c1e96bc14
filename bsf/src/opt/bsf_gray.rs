use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use rand::SeedableRng;
use rand::prelude::SmallRng;
use thousands::Separable;

use stringart_rs::builder::{GreedyPathBuilder, InitPolicy, PathResult};
use stringart_rs::canvas::Canvas;
use stringart_rs::nails::NailLayout;

use crate::config::BSFConfig;
use crate::opt::{default_init, working_canvas};

/// Best-Segment-First optimizer for a single grayscale target.
pub struct BSFOptimizerGray {
    pub target: Canvas,
    pub layout: NailLayout,
    pub config: BSFConfig,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    pub rng: SmallRng,
}

impl BSFOptimizerGray {
    pub fn new(target: Canvas, config: BSFConfig, rng: SmallRng) -> Result<Self> {
        let layout = NailLayout::new(target.shape(), config.layout)?;
        info!(
            "[BSF] layout holds {} nails on a {:?} canvas",
            layout.len(),
            layout.shape
        );
        Ok(Self {
            target,
            layout,
            config,
            rng,
        })
    }

    /// Solves one section of a chained multi-image run: the search starts at
    /// the previous section's final nail (clamped into this layout) and the
    /// returned index is the nail the thread leaves this section on.
    pub fn solve_section(&mut self, handover_idx: usize) -> Result<(PathResult, usize)> {
        let start_idx = handover_idx.min(self.layout.len().saturating_sub(1));
        let result = self.solve(default_init(&self.config.strategy, start_idx))?;
        let handover = *result
            .pull_order
            .last()
            .context("greedy run produced an empty pull order")?;
        Ok((result, handover))
    }

    pub fn solve(&mut self, init: InitPolicy) -> Result<PathResult> {
        let start = Instant::now();
        let canvas = working_canvas(
            &self.config.strategy,
            &self.target,
            self.config.dark_background,
        )?;
        let builder = GreedyPathBuilder::new(
            &self.layout,
            &self.target,
            canvas,
            self.config.strategy,
            init,
            self.config.limits,
            SmallRng::from_rng(&mut self.rng),
        )?;
        let result = builder.run();
        info!(
            "[BSF] solved in {:.3}ms: {} pull order entries ({:?})",
            start.elapsed().as_secs_f64() * 1000.0,
            result.pull_order.len().separate_with_commas(),
            result.stop
        );
        Ok(result)
    }
}
