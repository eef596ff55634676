//! Entry points of the command line subcommands.

pub mod simulation;
pub mod wavetypes;
