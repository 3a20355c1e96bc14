use serde::Serialize;

use stringart_rs::builder::StopReason;

use crate::config::BSFConfig;

/// JSON artifact bundling everything needed to audit or replay one run.
#[derive(Serialize, Clone, Debug)]
pub struct BSFOutput {
    pub config: BSFConfig,
    pub n_nails: usize,
    /// One stop reason per channel run
    pub stops: Vec<StopReason>,
    /// 1-based nail indices, one order per channel (a single entry for grayscale)
    pub pull_orders: Vec<Vec<usize>>,
}

impl BSFOutput {
    pub fn new(
        config: BSFConfig,
        n_nails: usize,
        stops: Vec<StopReason>,
        pull_orders: &[&[usize]],
    ) -> Self {
        Self {
            config,
            n_nails,
            stops,
            pull_orders: pull_orders
                .iter()
                .map(|order| order.iter().map(|i| i + 1).collect())
                .collect(),
        }
    }
}
