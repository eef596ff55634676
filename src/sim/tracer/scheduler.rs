//! Bounded-parallelism execution of tracing workers.

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::worker::{TraceOutcome, Worker};

/// Tally of trace outcomes of one `wait`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub escaped: usize,
    pub absorbed: usize,
    pub hop_limit: usize,
    pub aborted: usize,
}

impl TraceStats {
    pub fn total(&self) -> usize {
        self.escaped + self.absorbed + self.hop_limit + self.aborted
    }

    fn add(&mut self, outcome: TraceOutcome) {
        match outcome {
            TraceOutcome::Escaped => self.escaped += 1,
            TraceOutcome::Absorbed => self.absorbed += 1,
            TraceOutcome::HopLimit => self.hop_limit += 1,
            TraceOutcome::Aborted => self.aborted += 1,
        }
    }
}

impl std::ops::AddAssign for TraceStats {
    fn add_assign(&mut self, other: Self) {
        self.escaped += other.escaped;
        self.absorbed += other.absorbed;
        self.hop_limit += other.hop_limit;
        self.aborted += other.aborted;
    }
}

/// Runs submitted workers on a dedicated pool of `parallelism` threads.
pub struct Scheduler {
    pool: rayon::ThreadPool,
    queue: Vec<Worker>,
}

impl Scheduler {
    pub fn new(parallelism: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism.max(1))
            .thread_name(|i| format!("tracer-{}", i))
            .build()
            .context("Failed to build tracing thread pool")?;
        Ok(Self {
            pool,
            queue: Vec::new(),
        })
    }

    pub fn parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queues a worker. Nothing runs until [`Scheduler::wait`].
    pub fn submit(&mut self, mut worker: Worker) {
        worker.schedule();
        self.queue.push(worker);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Runs every queued worker and blocks until all have completed.
    ///
    /// All workers run even if some fail; the first failure is returned.
    pub fn wait(&mut self) -> Result<TraceStats> {
        let jobs = std::mem::take(&mut self.queue);
        tracing::debug!(workers = jobs.len(), threads = self.parallelism(), "Running workers");

        let outcomes: Vec<Result<TraceOutcome>> = self
            .pool
            .install(|| jobs.into_par_iter().map(|mut worker| worker.run()).collect());

        let mut stats = TraceStats::default();
        for outcome in outcomes {
            stats.add(outcome?);
        }
        Ok(stats)
    }
}
