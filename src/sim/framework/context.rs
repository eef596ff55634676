use std::sync::Arc;

use crate::sim::dataset::{Dataset, TraceCounter};
use crate::sim::engine::InteractionEngine;

/// Default upper bound on layer interactions per ray.
pub const DEFAULT_MAX_HOPS: usize = 200;

/// Read-mostly context shared by all workers of a run.
///
/// The engine is immutable; the dataset and counter synchronize internally,
/// so workers only ever need `&TraceContext`.
pub struct TraceContext {
    pub engine: InteractionEngine,
    pub dataset: Dataset,
    pub counter: TraceCounter,
    pub max_hops: usize,
}

impl TraceContext {
    pub fn new(engine: InteractionEngine, dataset: Dataset) -> Self {
        Self {
            engine,
            dataset,
            counter: TraceCounter::new(),
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
