pub mod antenna;

pub use antenna::Antenna;
