//! The five operating modes of the hourly dispatch state machine.
//!
//! Mode selection is a pure function of the pricing period and the battery
//! charge entering the hour; each mode writes a fixed set of flow channels
//! and forces the rest to zero by leaving them at their initial value.

use super::types::{Direction, HourlyRecord, Period, SystemParameters};

/// Operating mode for one hour of dispatch.
///
/// The two peak modes are mutually exclusive and exhaustive over
/// peak/intermediate hours, and the three off-peak modes over off-peak
/// hours. No mode carries memory beyond the storage level scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Peak or intermediate hour; the battery alone covers demand.
    PeakBatteryOnly,
    /// Peak or intermediate hour; the battery is drawn down to the depleted
    /// floor and the grid buys the remainder.
    PeakBatteryAndGrid,
    /// Off-peak hour; the remaining headroom fits within one hour of
    /// charging, so the battery is filled exactly to capacity.
    OffPeakTopOff,
    /// Off-peak hour; headroom exceeds the one-hour limit, so the battery
    /// charges at the maximum rate.
    OffPeakPartialCharge,
    /// Off-peak hour; the battery is already full and nothing is bought
    /// for storage.
    OffPeakBatteryFull,
}

impl DispatchMode {
    /// Selects the mode for one hour.
    ///
    /// The period class (discharge window vs off-peak) is the outer branch;
    /// the deliverable-energy or headroom comparison is the inner branch.
    pub fn select(
        period: Period,
        storage_available: f32,
        demand: f32,
        params: &SystemParameters,
    ) -> Self {
        if period.is_discharge_window() {
            // Energy the battery can deliver to demand after discharge
            // losses through battery and inverter, without breaching the
            // depleted floor.
            let deliverable = (storage_available - params.battery_depleted_floor)
                * params
                    .battery_efficiency
                    .for_direction(Direction::Discharging)
                * params
                    .inverter_efficiency
                    .for_direction(Direction::Discharging);
            if deliverable >= demand {
                DispatchMode::PeakBatteryOnly
            } else {
                DispatchMode::PeakBatteryAndGrid
            }
        } else if storage_available < params.storage_size {
            let headroom = params.storage_size - storage_available;
            if headroom
                <= params
                    .inverter_efficiency
                    .for_direction(Direction::Charging)
                    * params.max_charge_rate
            {
                DispatchMode::OffPeakTopOff
            } else {
                DispatchMode::OffPeakPartialCharge
            }
        } else {
            DispatchMode::OffPeakBatteryFull
        }
    }

    /// Applies this mode's flow equations to `record`.
    ///
    /// `record` must have `demand`, `period`, and `storage_available_start`
    /// populated and every other field zero; the non-active channels of each
    /// mode stay at that zero.
    pub fn apply(self, record: &mut HourlyRecord, params: &SystemParameters) {
        let start = record.storage_available_start;
        match self {
            DispatchMode::PeakBatteryOnly => {
                let eta_inv = params
                    .inverter_efficiency
                    .for_direction(Direction::Discharging);
                let eta_bat = params
                    .battery_efficiency
                    .for_direction(Direction::Discharging);
                record.inverter_to_demand = record.demand;
                record.storage_to_inverter = record.inverter_to_demand / eta_inv;
                // Drawdown mirrors the deliverable-energy check in select():
                // each discharge stage divides, so the floor is never
                // breached when this mode fires.
                record.storage_available_next = start - record.storage_to_inverter / eta_bat;
            }
            DispatchMode::PeakBatteryAndGrid => {
                record.storage_to_inverter = (start - params.battery_depleted_floor)
                    * params
                        .battery_efficiency
                        .for_direction(Direction::Discharging);
                record.inverter_to_demand = record.storage_to_inverter
                    * params
                        .inverter_efficiency
                        .for_direction(Direction::Discharging);
                // Grid makes up the difference.
                record.grid_to_demand_peak = record.demand - record.inverter_to_demand;
                record.storage_available_next = params.battery_depleted_floor;
            }
            DispatchMode::OffPeakTopOff => {
                record.grid_to_demand_offpeak = record.demand;
                record.inverter_to_storage = (params.storage_size - start)
                    / params.battery_efficiency.for_direction(Direction::Charging);
                record.grid_to_inverter = record.inverter_to_storage
                    / params
                        .inverter_efficiency
                        .for_direction(Direction::Charging);
                record.storage_available_next = params.storage_size;
            }
            DispatchMode::OffPeakPartialCharge => {
                record.grid_to_demand_offpeak = record.demand;
                // The top-off test scales the rate by inverter efficiency,
                // leaving a narrow band where a full-rate hour would
                // overshoot capacity; stored energy is capped so the charge
                // level never exceeds the battery.
                let stored = params.max_charge_rate.min(params.storage_size - start);
                record.inverter_to_storage =
                    stored / params.battery_efficiency.for_direction(Direction::Charging);
                record.grid_to_inverter = record.inverter_to_storage
                    / params
                        .inverter_efficiency
                        .for_direction(Direction::Charging);
                record.storage_available_next = start + stored;
            }
            DispatchMode::OffPeakBatteryFull => {
                record.grid_to_demand_offpeak = record.demand;
                record.storage_available_next = params.storage_size;
            }
        }
    }
}
