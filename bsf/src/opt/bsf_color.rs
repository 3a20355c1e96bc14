use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use rand::SeedableRng;
use rand::prelude::SmallRng;

use stringart_rs::builder::{GreedyPathBuilder, InitPolicy, PathResult};
use stringart_rs::canvas::Canvas;
use stringart_rs::nails::NailLayout;

use crate::config::BSFConfig;
use crate::opt::{default_init, working_canvas};

/// Best-Segment-First optimizer for a three-channel color target.
///
/// Each channel runs its own independent greedy search; since every run
/// exclusively owns its working canvas the three searches execute in
/// parallel, synchronizing only for the final interleaved render.
pub struct BSFOptimizerColor {
    pub targets: [Canvas; 3],
    pub layout: NailLayout,
    pub config: BSFConfig,
    pub rng: SmallRng,
}

impl BSFOptimizerColor {
    pub fn new(targets: [Canvas; 3], config: BSFConfig, rng: SmallRng) -> Result<Self> {
        let layout = NailLayout::new(targets[0].shape(), config.layout)?;
        info!(
            "[BSF] layout holds {} nails on a {:?} canvas (3 channels)",
            layout.len(),
            layout.shape
        );
        Ok(Self {
            targets,
            layout,
            config,
            rng,
        })
    }

    /// Solves one section of a chained multi-image run. All three channels
    /// start at the previous section's final nail (clamped into this layout);
    /// the red channel's final nail carries the handover to the next section.
    pub fn solve_section(&mut self, handover_idx: usize) -> Result<([PathResult; 3], usize)> {
        let start_idx = handover_idx.min(self.layout.len().saturating_sub(1));
        let results = self.solve(default_init(&self.config.strategy, start_idx))?;
        let handover = *results[0]
            .pull_order
            .last()
            .context("greedy run produced an empty pull order")?;
        Ok((results, handover))
    }

    pub fn solve(&mut self, init: InitPolicy) -> Result<[PathResult; 3]> {
        let start = Instant::now();

        // forked up front so the channel runs stay reproducible regardless
        // of which worker thread picks them up
        let rng_r = SmallRng::from_rng(&mut self.rng);
        let rng_g = SmallRng::from_rng(&mut self.rng);
        let rng_b = SmallRng::from_rng(&mut self.rng);

        let run = |target: &Canvas, rng: SmallRng| -> Result<PathResult> {
            let canvas =
                working_canvas(&self.config.strategy, target, self.config.dark_background)?;
            let builder = GreedyPathBuilder::new(
                &self.layout,
                target,
                canvas,
                self.config.strategy,
                init,
                self.config.limits,
                rng,
            )?;
            Ok(builder.run())
        };

        let [t_r, t_g, t_b] = &self.targets;
        let ((red, green), blue) = rayon::join(
            || rayon::join(|| run(t_r, rng_r), || run(t_g, rng_g)),
            || run(t_b, rng_b),
        );
        let results = [red?, green?, blue?];

        info!(
            "[BSF] 3 channels solved in {:.3}ms: {} / {} / {} pull order entries",
            start.elapsed().as_secs_f64() * 1000.0,
            results[0].pull_order.len(),
            results[1].pull_order.len(),
            results[2].pull_order.len(),
        );
        Ok(results)
    }
}
