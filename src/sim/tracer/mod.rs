//! Rays and the machinery that traces them concurrently.

pub mod ray;
pub mod scheduler;
pub mod worker;

pub use ray::{Ray, WaveBehaviour};
pub use scheduler::{Scheduler, TraceStats};
pub use worker::{TraceOutcome, Worker, WorkerState};
