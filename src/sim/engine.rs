//! Year-long dispatch scan over the hourly series.

use super::modes::DispatchMode;
use super::types::{DispatchError, HourlyRecord, Period, SystemParameters};

/// Runs the dispatch engine over an ordered hourly series.
///
/// Takes records with only `demand` and `period` populated and returns the
/// same series with every flow channel and both storage levels filled in.
/// The battery starts the series fully charged; each subsequent hour starts
/// from the previous hour's ending charge. The scan is a pure left-to-right
/// fold over the single storage scalar, so identical inputs always produce
/// identical outputs.
///
/// Every hour is dispatched, including the last: the final hour's
/// `storage_available_next` is computed but has no successor to receive it.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidParameter`] if `params` fails validation,
/// or [`DispatchError::InvalidRecord`] at the first hour whose demand is
/// negative or non-finite. No partial results are produced in either case.
pub fn run(
    mut series: Vec<HourlyRecord>,
    params: &SystemParameters,
) -> Result<Vec<HourlyRecord>, DispatchError> {
    params.validate()?;
    for (hour, record) in series.iter().enumerate() {
        if !record.demand.is_finite() || record.demand < 0.0 {
            return Err(DispatchError::invalid_record(
                hour,
                format!(
                    "demand must be a non-negative finite number, got {}",
                    record.demand
                ),
            ));
        }
    }

    let mut storage_available = params.storage_size;
    for record in series.iter_mut() {
        record.storage_available_start = storage_available;
        let mode = DispatchMode::select(record.period, storage_available, record.demand, params);
        mode.apply(record, params);
        storage_available = record.storage_available_next;
    }

    Ok(series)
}

/// Builds an input series from parallel demand and period slices.
///
/// Convenience for drivers that produce the two columns separately; the
/// shorter slice bounds the series length.
pub fn build_series(demand: &[f32], periods: &[Period]) -> Vec<HourlyRecord> {
    demand
        .iter()
        .zip(periods.iter())
        .map(|(&d, &p)| HourlyRecord::new(d, p))
        .collect()
}
