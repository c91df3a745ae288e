//! Core dispatch types: pricing periods, hourly records, system parameters,
//! and the engine error taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Time-of-use pricing period for one hour.
///
/// `Intermediate` is priced between peak and off-peak but dispatches
/// identically to `Peak`: the battery discharges during both and only
/// recharges during off-peak hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    Peak,
    Intermediate,
    OffPeak,
}

impl Period {
    /// Whether the battery may discharge during this hour.
    pub fn is_discharge_window(self) -> bool {
        matches!(self, Period::Peak | Period::Intermediate)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::Peak => "peak",
            Period::Intermediate => "intermediate",
            Period::OffPeak => "off-peak",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Period {
    type Err = String;

    /// Parses the period labels used in metered data files.
    ///
    /// Accepts `"peak"`, `"int"`/`"intermediate"`, and
    /// `"off-peak"`/`"offpeak"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peak" => Ok(Period::Peak),
            "int" | "intermediate" => Ok(Period::Intermediate),
            "off-peak" | "offpeak" => Ok(Period::OffPeak),
            other => Err(format!(
                "unrecognized period \"{other}\" (expected peak, int, intermediate, off-peak)"
            )),
        }
    }
}

/// Direction of energy flow through a conversion stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Charging,
    Discharging,
}

/// Efficiency factors for one conversion stage (battery or inverter),
/// each a fraction in `(0, 1]`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Efficiency {
    /// Fraction of input energy retained when charging.
    pub charging: f32,
    /// Fraction of stored energy retained when discharging.
    pub discharging: f32,
}

impl Efficiency {
    /// A lossless stage (both directions 1.0).
    pub const IDEAL: Efficiency = Efficiency {
        charging: 1.0,
        discharging: 1.0,
    };

    /// Returns the factor for the given flow direction.
    pub fn for_direction(self, direction: Direction) -> f32 {
        match direction {
            Direction::Charging => self.charging,
            Direction::Discharging => self.discharging,
        }
    }
}

/// Immutable battery and inverter configuration for one simulation run.
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Total battery capacity (kWh).
    pub storage_size: f32,
    /// Minimum allowed charge level (kWh); discharge never goes below this.
    pub battery_depleted_floor: f32,
    /// Maximum energy deliverable to the battery in one hour, measured
    /// after the inverter (kWh).
    pub max_charge_rate: f32,
    /// Battery charge/discharge efficiency factors.
    pub battery_efficiency: Efficiency,
    /// Inverter charge/discharge efficiency factors.
    pub inverter_efficiency: Efficiency,
}

impl SystemParameters {
    /// Checks all parameter ranges, failing on the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidParameter`] if `storage_size <= 0`,
    /// the depleted floor is outside `[0, storage_size)`, the charge rate is
    /// negative, or any efficiency factor is outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if !(self.storage_size > 0.0) {
            return Err(DispatchError::invalid_parameter(
                "storage_size",
                format!("must be > 0, got {}", self.storage_size),
            ));
        }
        if !(0.0..self.storage_size).contains(&self.battery_depleted_floor) {
            return Err(DispatchError::invalid_parameter(
                "battery_depleted_floor",
                format!(
                    "must be in [0, storage_size), got {} with storage_size {}",
                    self.battery_depleted_floor, self.storage_size
                ),
            ));
        }
        if !(self.max_charge_rate >= 0.0) {
            return Err(DispatchError::invalid_parameter(
                "max_charge_rate",
                format!("must be >= 0, got {}", self.max_charge_rate),
            ));
        }
        for (field, value) in [
            (
                "battery_efficiency.charging",
                self.battery_efficiency.charging,
            ),
            (
                "battery_efficiency.discharging",
                self.battery_efficiency.discharging,
            ),
            (
                "inverter_efficiency.charging",
                self.inverter_efficiency.charging,
            ),
            (
                "inverter_efficiency.discharging",
                self.inverter_efficiency.discharging,
            ),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(DispatchError::invalid_parameter(
                    field,
                    format!("must be in (0, 1], got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// One hour of the simulation: driver-supplied inputs plus the flows and
/// storage levels computed by the dispatch engine.
///
/// Records are ordered by hour index; each hour's
/// `storage_available_start` is the previous hour's
/// `storage_available_next`. All energy quantities are kWh.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Energy required during the hour (input, non-negative).
    pub demand: f32,
    /// Pricing period classification (input).
    pub period: Period,
    /// Battery charge at the start of the hour.
    pub storage_available_start: f32,
    /// Battery charge handed to the next hour. Computed for every hour;
    /// the final hour's value has no successor to receive it.
    pub storage_available_next: f32,
    /// Energy from the inverter into the battery (off-peak charging only).
    pub inverter_to_storage: f32,
    /// Grid energy feeding the inverter for charging (off-peak only).
    pub grid_to_inverter: f32,
    /// Energy leaving the battery toward the inverter (peak discharge only).
    pub storage_to_inverter: f32,
    /// Inverter output delivered to demand (peak discharge only).
    pub inverter_to_demand: f32,
    /// Grid purchases serving demand directly during peak/intermediate hours.
    pub grid_to_demand_peak: f32,
    /// Grid purchases serving demand directly during off-peak hours.
    pub grid_to_demand_offpeak: f32,
}

impl HourlyRecord {
    /// Creates a record with the inputs set and every computed field zeroed.
    pub fn new(demand: f32, period: Period) -> Self {
        Self {
            demand,
            period,
            storage_available_start: 0.0,
            storage_available_next: 0.0,
            inverter_to_storage: 0.0,
            grid_to_inverter: 0.0,
            storage_to_inverter: 0.0,
            inverter_to_demand: 0.0,
            grid_to_demand_peak: 0.0,
            grid_to_demand_offpeak: 0.0,
        }
    }
}

impl fmt::Display for HourlyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>12} | demand={:>6.2}  storage={:>6.2}->{:>6.2} | \
             bat->demand={:>6.2}  grid->demand={:>6.2}  grid->charge={:>6.2}",
            self.period.to_string(),
            self.demand,
            self.storage_available_start,
            self.storage_available_next,
            self.inverter_to_demand,
            self.grid_to_demand_peak + self.grid_to_demand_offpeak,
            self.grid_to_inverter,
        )
    }
}

/// Dispatch engine failure: either malformed parameters (reported before any
/// hour is processed) or a malformed record (reported with its hour index).
///
/// The engine never produces partial results; callers get either a fully
/// populated series or one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// A `SystemParameters` field is out of range.
    InvalidParameter {
        /// Dotted field path (e.g., `"battery_efficiency.charging"`).
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },
    /// An input record is malformed.
    InvalidRecord {
        /// Hour index of the offending record.
        hour: usize,
        /// Human-readable constraint description.
        message: String,
    },
}

impl DispatchError {
    pub(crate) fn invalid_parameter(field: &'static str, message: String) -> Self {
        DispatchError::InvalidParameter { field, message }
    }

    pub(crate) fn invalid_record(hour: usize, message: String) -> Self {
        DispatchError::InvalidRecord { hour, message }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidParameter { field, message } => {
                write!(f, "invalid parameter {field}: {message}")
            }
            DispatchError::InvalidRecord { hour, message } => {
                write!(f, "invalid record at hour {hour}: {message}")
            }
        }
    }
}

impl std::error::Error for DispatchError {}
