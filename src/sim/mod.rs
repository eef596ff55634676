pub mod complex;
pub mod constants;
pub mod dataset;
pub mod engine;
pub mod framework;
pub mod scene;
pub mod simulation;
pub mod sweep;
pub mod tracer;
