pub mod commands;
pub mod config;
pub mod error;
pub mod geom;
pub mod io;
pub mod radio;
pub mod sim;

// Prelude
pub use geom::point::Point;
pub use geom::vector::Vector;
pub use sim::scene::Scene;
pub use sim::tracer::Ray;
