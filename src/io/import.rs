//! CSV import for metered hourly demand series.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::sim::types::Period;

/// An imported demand series: one demand value per hour, plus per-hour
/// pricing periods when the file carries a `period` column.
#[derive(Debug, Clone)]
pub struct DemandSeries {
    /// Hourly demand values (kWh).
    pub demand_kwh: Vec<f32>,
    /// Hourly pricing periods, present only if the file had a `period` column.
    pub periods: Option<Vec<Period>>,
}

/// Import error with the offending data row (1-based, excluding the header).
#[derive(Debug)]
pub struct ImportError {
    /// Data row number, or 0 for file-level problems.
    pub row: usize,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.row == 0 {
            write!(f, "import error: {}", self.message)
        } else {
            write!(f, "import error at row {}: {}", self.row, self.message)
        }
    }
}

impl std::error::Error for ImportError {}

/// Loads an hourly demand series from a CSV file.
///
/// The file must have a header with a `demand_kwh` column and may carry a
/// `period` column with the labels accepted by [`Period::from_str`]
/// (`peak`, `int`, `intermediate`, `off-peak`). Rows are hours in order.
///
/// # Errors
///
/// Returns an [`ImportError`] if the file cannot be read, the required
/// column is missing, or any row fails to parse; parsing stops at the
/// first bad row.
pub fn load_demand_csv(path: &Path) -> Result<DemandSeries, ImportError> {
    let file = File::open(path).map_err(|e| ImportError {
        row: 0,
        message: format!("cannot open \"{}\": {e}", path.display()),
    })?;
    read_demand_csv(file)
}

/// Reads an hourly demand series from any reader; see [`load_demand_csv`].
///
/// # Errors
///
/// Same conditions as [`load_demand_csv`].
pub fn read_demand_csv(reader: impl Read) -> Result<DemandSeries, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| ImportError {
            row: 0,
            message: format!("cannot read header: {e}"),
        })?
        .clone();

    let demand_idx = headers
        .iter()
        .position(|h| h.trim() == "demand_kwh")
        .ok_or_else(|| ImportError {
            row: 0,
            message: "missing required column \"demand_kwh\"".to_string(),
        })?;
    let period_idx = headers.iter().position(|h| h.trim() == "period");

    let mut demand_kwh = Vec::new();
    let mut periods = period_idx.map(|_| Vec::new());

    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| ImportError {
            row,
            message: format!("malformed row: {e}"),
        })?;

        let raw = record.get(demand_idx).ok_or_else(|| ImportError {
            row,
            message: "row is missing the demand_kwh field".to_string(),
        })?;
        let demand: f32 = raw.trim().parse().map_err(|_| ImportError {
            row,
            message: format!("demand_kwh \"{raw}\" is not a number"),
        })?;
        demand_kwh.push(demand);

        if let (Some(idx), Some(out)) = (period_idx, periods.as_mut()) {
            let label = record.get(idx).ok_or_else(|| ImportError {
                row,
                message: "row is missing the period field".to_string(),
            })?;
            let period: Period = label
                .parse()
                .map_err(|e: String| ImportError { row, message: e })?;
            out.push(period);
        }
    }

    Ok(DemandSeries {
        demand_kwh,
        periods,
    })
}
