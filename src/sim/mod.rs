//! Dispatch engine core: hourly record types, the five-mode state machine,
//! the year-long scan, and post-hoc reporting.

pub mod engine;
/// The five dispatch operating modes and their flow equations.
pub mod modes;
pub mod report;
pub mod types;
