//! Hourly time-of-use battery storage dispatch simulator.

pub mod config;
/// Synthetic demand profile generation.
pub mod demand;
pub mod io;
/// Time-of-use calendar expansion.
pub mod schedule;
pub mod sim;
