//! Post-hoc annual aggregates computed from a dispatched series.

use std::fmt;

use super::types::HourlyRecord;

/// Aggregate figures derived from a complete dispatched year.
///
/// Computed post-hoc from the finished `Vec<HourlyRecord>` so the summary
/// can never disagree with the per-hour data.
#[derive(Debug, Clone)]
pub struct AnnualReport {
    /// Total demand across all hours (kWh).
    pub total_demand_kwh: f32,
    /// Energy delivered to demand from the battery (kWh).
    pub battery_delivered_kwh: f32,
    /// Direct grid purchases during peak/intermediate hours (kWh).
    pub grid_peak_kwh: f32,
    /// Direct grid purchases during off-peak hours (kWh).
    pub grid_offpeak_kwh: f32,
    /// Grid energy bought to recharge the battery (kWh).
    pub grid_charging_kwh: f32,
    /// Hours where the battery alone covered demand.
    pub battery_only_hours: usize,
    /// Hours where the battery was exhausted and the grid assisted.
    pub battery_assisted_hours: usize,
    /// Hours with any battery charging.
    pub charging_hours: usize,
    /// Lowest battery charge level reached (kWh).
    pub min_storage_kwh: f32,
    /// Discharge throughput divided by capacity.
    pub equivalent_full_cycles: f32,
}

impl AnnualReport {
    /// Computes all aggregates from the dispatched series.
    ///
    /// `storage_size` is used for the cycle count and as the reported
    /// minimum when the series is empty.
    pub fn from_records(records: &[HourlyRecord], storage_size: f32) -> Self {
        let mut total_demand = 0.0_f32;
        let mut battery_delivered = 0.0_f32;
        let mut grid_peak = 0.0_f32;
        let mut grid_offpeak = 0.0_f32;
        let mut grid_charging = 0.0_f32;
        let mut battery_only = 0_usize;
        let mut battery_assisted = 0_usize;
        let mut charging = 0_usize;
        let mut min_storage = storage_size;
        let mut discharge_throughput = 0.0_f32;

        for r in records {
            total_demand += r.demand;
            battery_delivered += r.inverter_to_demand;
            grid_peak += r.grid_to_demand_peak;
            grid_offpeak += r.grid_to_demand_offpeak;
            grid_charging += r.grid_to_inverter;

            if r.period.is_discharge_window() {
                if r.grid_to_demand_peak > 0.0 {
                    battery_assisted += 1;
                } else if r.inverter_to_demand > 0.0 {
                    battery_only += 1;
                }
            }
            if r.grid_to_inverter > 0.0 {
                charging += 1;
            }

            min_storage = min_storage.min(r.storage_available_next);
            let drawdown = r.storage_available_start - r.storage_available_next;
            if drawdown > 0.0 {
                discharge_throughput += drawdown;
            }
        }

        let cycles = if storage_size > 0.0 {
            discharge_throughput / storage_size
        } else {
            0.0
        };

        Self {
            total_demand_kwh: total_demand,
            battery_delivered_kwh: battery_delivered,
            grid_peak_kwh: grid_peak,
            grid_offpeak_kwh: grid_offpeak,
            grid_charging_kwh: grid_charging,
            battery_only_hours: battery_only,
            battery_assisted_hours: battery_assisted,
            charging_hours: charging,
            min_storage_kwh: min_storage,
            equivalent_full_cycles: cycles,
        }
    }

    /// Total energy purchased from the grid, for demand and for charging.
    pub fn grid_total_kwh(&self) -> f32 {
        self.grid_peak_kwh + self.grid_offpeak_kwh + self.grid_charging_kwh
    }
}

impl fmt::Display for AnnualReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Annual Dispatch Report ---")?;
        writeln!(f, "Total demand:          {:.1} kWh", self.total_demand_kwh)?;
        writeln!(
            f,
            "Served from battery:   {:.1} kWh",
            self.battery_delivered_kwh
        )?;
        writeln!(f, "Grid, peak direct:     {:.1} kWh", self.grid_peak_kwh)?;
        writeln!(f, "Grid, off-peak direct: {:.1} kWh", self.grid_offpeak_kwh)?;
        writeln!(f, "Grid, battery charge:  {:.1} kWh", self.grid_charging_kwh)?;
        writeln!(f, "Grid total:            {:.1} kWh", self.grid_total_kwh())?;
        writeln!(
            f,
            "Hours battery-only / assisted / charging: {} / {} / {}",
            self.battery_only_hours, self.battery_assisted_hours, self.charging_hours
        )?;
        writeln!(f, "Minimum storage level: {:.2} kWh", self.min_storage_kwh)?;
        write!(
            f,
            "Equivalent full cycles: {:.1}",
            self.equivalent_full_cycles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::engine;
    use crate::sim::types::{Efficiency, HourlyRecord, Period, SystemParameters};

    fn params() -> SystemParameters {
        SystemParameters {
            storage_size: 10.0,
            battery_depleted_floor: 2.0,
            max_charge_rate: 3.0,
            battery_efficiency: Efficiency::IDEAL,
            inverter_efficiency: Efficiency::IDEAL,
        }
    }

    fn dispatched(series: Vec<HourlyRecord>) -> Vec<HourlyRecord> {
        engine::run(series, &params()).unwrap()
    }

    #[test]
    fn empty_series_reports_zeroes() {
        let report = AnnualReport::from_records(&[], 10.0);
        assert_eq!(report.total_demand_kwh, 0.0);
        assert_eq!(report.battery_only_hours, 0);
        assert_eq!(report.min_storage_kwh, 10.0);
        assert_eq!(report.equivalent_full_cycles, 0.0);
    }

    #[test]
    fn totals_add_up() {
        let out = dispatched(vec![
            HourlyRecord::new(5.0, Period::Peak),
            HourlyRecord::new(12.0, Period::Peak),
            HourlyRecord::new(2.0, Period::OffPeak),
        ]);
        let report = AnnualReport::from_records(&out, 10.0);
        assert!((report.total_demand_kwh - 19.0).abs() < 1e-5);
        // Hour 0: battery serves 5. Hour 1: battery serves remaining 3, grid 9.
        assert!((report.battery_delivered_kwh - 8.0).abs() < 1e-5);
        assert!((report.grid_peak_kwh - 9.0).abs() < 1e-5);
        assert!((report.grid_offpeak_kwh - 2.0).abs() < 1e-5);
        assert!(report.grid_charging_kwh > 0.0);
    }

    #[test]
    fn hour_classification() {
        let out = dispatched(vec![
            HourlyRecord::new(5.0, Period::Peak),     // battery only
            HourlyRecord::new(12.0, Period::Peak),    // battery + grid
            HourlyRecord::new(1.0, Period::OffPeak),  // charging
            HourlyRecord::new(1.0, Period::OffPeak),  // charging
        ]);
        let report = AnnualReport::from_records(&out, 10.0);
        assert_eq!(report.battery_only_hours, 1);
        assert_eq!(report.battery_assisted_hours, 1);
        assert_eq!(report.charging_hours, 2);
    }

    #[test]
    fn min_storage_tracks_floor_visits() {
        let out = dispatched(vec![
            HourlyRecord::new(20.0, Period::Peak), // drains to the floor
            HourlyRecord::new(0.0, Period::OffPeak),
        ]);
        let report = AnnualReport::from_records(&out, 10.0);
        assert_eq!(report.min_storage_kwh, 2.0);
    }

    #[test]
    fn cycles_count_discharge_throughput() {
        let out = dispatched(vec![HourlyRecord::new(8.0, Period::Peak)]);
        let report = AnnualReport::from_records(&out, 10.0);
        assert!((report.equivalent_full_cycles - 0.8).abs() < 1e-5);
    }

    #[test]
    fn display_does_not_panic() {
        let out = dispatched(vec![HourlyRecord::new(3.0, Period::Peak)]);
        let report = AnnualReport::from_records(&out, 10.0);
        let s = format!("{report}");
        assert!(s.contains("Annual Dispatch Report"));
    }
}
