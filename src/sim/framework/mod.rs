//! Shared state handed to every tracing worker.

pub mod context;

pub use context::TraceContext;
