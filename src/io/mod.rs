//! File I/O: CSV export of dispatched series and import of metered demand.

pub mod export;
pub mod import;
