use crate::canvas::Canvas;
use crate::nails::NailLayout;
use crate::score::Strategy;
use anyhow::{Result, ensure};
use log::{debug, info};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

/// How the first entries of the pull order are chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InitPolicy {
    /// Probe the nails adjacent to `near` as thread origins, commit to the one
    /// whose best first hop scores strictly higher, seed the pull order with
    /// `[origin, hop]` and draw that first segment.
    AdjacentSeek { near: usize },
    /// Begin at a fixed nail, seeding the pull order with `[at]` alone.
    Fixed { at: usize },
}

/// Iteration limits of the greedy loop.
///
/// With both limits `None` the loop only stops once no legal candidate
/// remains, which neither strategy is guaranteed to ever reach.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of extending iterations, counted whether the winning
    /// candidate is accepted or not. The seed is not counted. A rejected
    /// winner leaves the canvas untouched, so only counting every iteration
    /// keeps the loop bounded without a failure cap.
    pub max_steps: Option<usize>,
    /// Maximum number of consecutive evaluations whose winner fails the
    /// strategy's acceptance threshold. The counter resets on every acceptance.
    pub failure_cap: Option<usize>,
}

/// Why a greedy run stopped. All of these are expected, non-exceptional
/// outcomes: the pull order built so far is always valid and renderable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// No legal candidate was left to evaluate.
    Exhausted,
    /// The segment cap or the failure cap was hit.
    CapReached,
    /// The caller requested cancellation at a step boundary.
    Cancelled,
}

/// The finished product of a greedy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    /// Ordered nail indices; consecutive entries denote one thread segment.
    pub pull_order: Vec<usize>,
    pub stop: StopReason,
    /// Consecutive non-improving evaluations at the moment the run stopped.
    pub failures: usize,
}

/// Drives the greedy selection loop: holds the current nail, the exclusively
/// owned working canvas and the growing pull order, and repeatedly applies the
/// winning candidate of the active [`Strategy`].
pub struct GreedyPathBuilder<'a> {
    layout: &'a NailLayout,
    target: &'a Canvas,
    canvas: Canvas,
    strategy: Strategy,
    init: InitPolicy,
    limits: Limits,
    rng: SmallRng,
    pull_order: Vec<usize>,
    current: usize,
    failures: usize,
}

impl<'a> GreedyPathBuilder<'a> {
    pub fn new(
        layout: &'a NailLayout,
        target: &'a Canvas,
        canvas: Canvas,
        strategy: Strategy,
        init: InitPolicy,
        limits: Limits,
        rng: SmallRng,
    ) -> Result<Self> {
        ensure!(!layout.is_empty(), "cannot build a path on an empty layout");
        ensure!(
            canvas.shape() == target.shape() && canvas.shape() == layout.shape,
            "working canvas {:?}, target {:?} and layout {:?} must share one shape",
            canvas.shape(),
            target.shape(),
            layout.shape
        );
        let start = match init {
            InitPolicy::AdjacentSeek { near } => near,
            InitPolicy::Fixed { at } => at,
        };
        ensure!(
            start < layout.len(),
            "initial nail index {start} out of range, layout has {} nails",
            layout.len()
        );
        Ok(Self {
            layout,
            target,
            canvas,
            strategy,
            init,
            limits,
            rng,
            pull_order: vec![],
            current: start,
            failures: 0,
        })
    }

    /// Runs the greedy loop to one of its natural stopping points.
    pub fn run(self) -> PathResult {
        self.run_until(|| false)
    }

    /// Runs the greedy loop, polling `cancelled` once per outer iteration.
    /// Cancellation takes effect at a step boundary, never mid-mutation.
    pub fn run_until(mut self, cancelled: impl Fn() -> bool) -> PathResult {
        if !self.seed() {
            info!("[GREEDY] no legal first segment, layout exhausted at seed");
            return self.finish(StopReason::Exhausted);
        }

        let mut steps = 0;
        let stop = loop {
            if cancelled() {
                break StopReason::Cancelled;
            }
            if self.limits.max_steps.is_some_and(|cap| steps >= cap) {
                break StopReason::CapReached;
            }
            steps += 1;

            let best = self.strategy.best_from(
                self.current,
                self.layout,
                &self.canvas,
                self.target,
                &mut self.rng,
            );
            let Some(best) = best else {
                break StopReason::Exhausted;
            };

            if !self.strategy.accepts(best.score) {
                self.failures += 1;
                debug!(
                    "[GREEDY] step {}: no improvement from nail {} ({} consecutive)",
                    steps, self.current, self.failures
                );
                if self.limits.failure_cap.is_some_and(|cap| self.failures >= cap) {
                    break StopReason::CapReached;
                }
                continue;
            }

            self.failures = 0;
            let from = self.current;
            self.accept(best.nail_idx);
            debug!(
                "[GREEDY] step {}: {} -> {} (score {:.5})",
                steps, from, best.nail_idx, best.score
            );
        };

        self.finish(stop)
    }

    /// Executes the initialization policy. Returns false when no first
    /// segment could be found (the pull order then only holds the seed entry).
    fn seed(&mut self) -> bool {
        match self.init {
            InitPolicy::Fixed { at } => {
                self.current = at;
                self.pull_order.push(at);
                true
            }
            InitPolicy::AdjacentSeek { near } => {
                let mut origins = vec![];
                if near > 0 {
                    origins.push(near - 1);
                }
                if near + 1 < self.layout.len() {
                    origins.push(near + 1);
                }
                if origins.is_empty() {
                    origins.push(near);
                }

                // the earlier origin keeps a tied first hop
                let mut best: Option<(usize, usize, f32)> = None;
                for &origin in &origins {
                    let candidate = self.strategy.best_from(
                        origin,
                        self.layout,
                        &self.canvas,
                        self.target,
                        &mut self.rng,
                    );
                    if let Some(c) = candidate {
                        if best.is_none_or(|(_, _, s)| c.score > s) {
                            best = Some((origin, c.nail_idx, c.score));
                        }
                    }
                }

                match best {
                    Some((origin, hop, score)) => {
                        // the seed segment is drawn unconditionally, improving or not
                        self.pull_order.push(origin);
                        self.current = origin;
                        self.accept(hop);
                        debug!("[GREEDY] seeded {origin} -> {hop} (score {score:.5})");
                        true
                    }
                    None => {
                        self.pull_order.push(origins[0]);
                        self.current = origins[0];
                        false
                    }
                }
            }
        }
    }

    /// Draws the segment from the current nail to `nail_idx` on the working
    /// canvas and advances the pull order.
    fn accept(&mut self, nail_idx: usize) {
        self.strategy.apply(
            &mut self.canvas,
            self.layout.position(self.current),
            self.layout.position(nail_idx),
        );
        self.pull_order.push(nail_idx);
        self.current = nail_idx;
    }

    fn finish(self, stop: StopReason) -> PathResult {
        info!(
            "[GREEDY] run stopped ({stop:?}): {} pull order entries, {} pending failures",
            self.pull_order.len(),
            self.failures
        );
        PathResult {
            pull_order: self.pull_order,
            stop,
            failures: self.failures,
        }
    }
}
