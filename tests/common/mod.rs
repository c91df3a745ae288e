//! Shared test fixtures for integration tests.

use tou_sim::config::ScenarioConfig;
use tou_sim::demand::DemandProfile;
use tou_sim::schedule::TouSchedule;
use tou_sim::sim::engine;
use tou_sim::sim::types::{Efficiency, HourlyRecord, SystemParameters};

/// Reference parameters from the boundary scenarios: 10 kWh battery,
/// floor 2, 3 kWh/h charge rate, lossless conversion.
pub fn ideal_params() -> SystemParameters {
    SystemParameters {
        storage_size: 10.0,
        battery_depleted_floor: 2.0,
        max_charge_rate: 3.0,
        battery_efficiency: Efficiency::IDEAL,
        inverter_efficiency: Efficiency::IDEAL,
    }
}

/// Parameters with realistic conversion losses on every stage.
pub fn lossy_params() -> SystemParameters {
    SystemParameters {
        storage_size: 10.0,
        battery_depleted_floor: 2.0,
        max_charge_rate: 3.0,
        battery_efficiency: Efficiency {
            charging: 0.9,
            discharging: 0.9,
        },
        inverter_efficiency: Efficiency {
            charging: 0.95,
            discharging: 0.95,
        },
    }
}

/// Builds a full synthetic year of input records from a scenario config.
pub fn synthetic_year(cfg: &ScenarioConfig) -> Vec<HourlyRecord> {
    let schedule = TouSchedule::from_config(&cfg.schedule);
    let mut profile = DemandProfile::from_config(&cfg.demand, cfg.simulation.seed);
    let demand = profile.year(cfg.simulation.hours);
    let periods = schedule.year(cfg.simulation.hours);
    engine::build_series(&demand, &periods)
}
