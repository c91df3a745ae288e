//! CSV export for dispatched hourly series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourlyRecord;

/// Column header for the hourly results CSV.
const HEADER: &str = "hour,period,demand_kwh,storage_start_kwh,storage_next_kwh,\
                      grid_to_inverter_kwh,inverter_to_storage_kwh,\
                      storage_to_inverter_kwh,inverter_to_demand_kwh,\
                      grid_to_demand_peak_kwh,grid_to_demand_offpeak_kwh";

/// Exports a dispatched series to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[HourlyRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes a dispatched series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[HourlyRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for (hour, r) in records.iter().enumerate() {
        wtr.write_record(&[
            hour.to_string(),
            r.period.to_string(),
            format!("{:.4}", r.demand),
            format!("{:.4}", r.storage_available_start),
            format!("{:.4}", r.storage_available_next),
            format!("{:.4}", r.grid_to_inverter),
            format!("{:.4}", r.inverter_to_storage),
            format!("{:.4}", r.storage_to_inverter),
            format!("{:.4}", r.inverter_to_demand),
            format!("{:.4}", r.grid_to_demand_peak),
            format!("{:.4}", r.grid_to_demand_offpeak),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
