//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::types::{Efficiency, SystemParameters};

/// Hours in the simulated non-leap year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation length and seeding.
    pub simulation: SimulationConfig,
    /// Battery and inverter parameters.
    pub system: SystemConfig,
    /// Time-of-use calendar parameters.
    pub schedule: ScheduleConfig,
    /// Synthetic demand profile parameters.
    pub demand: DemandConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Simulation length and seeding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of hours to simulate (8760 for a non-leap year).
    pub hours: usize,
    /// Seed for the synthetic demand profile noise.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hours: HOURS_PER_YEAR,
            seed: 42,
        }
    }
}

/// Battery and inverter parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Total battery capacity (kWh).
    pub storage_size: f32,
    /// Minimum allowed charge level (kWh).
    pub battery_depleted_floor: f32,
    /// Maximum post-inverter charging energy per hour (kWh).
    pub max_charge_rate: f32,
    /// Battery efficiency factors per direction.
    pub battery_efficiency: Efficiency,
    /// Inverter efficiency factors per direction.
    pub inverter_efficiency: Efficiency,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            storage_size: 24.0,
            battery_depleted_floor: 4.8,
            max_charge_rate: 6.0,
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
}

impl SystemConfig {
    /// Converts into the engine's parameter record.
    pub fn to_parameters(&self) -> SystemParameters {
        SystemParameters {
            storage_size: self.storage_size,
            battery_depleted_floor: self.battery_depleted_floor,
            max_charge_rate: self.max_charge_rate,
            battery_efficiency: self.battery_efficiency,
            inverter_efficiency: self.inverter_efficiency,
        }
    }
}

/// Time-of-use calendar parameters.
///
/// Weekday afternoons carry the peak window, flanked by intermediate
/// shoulder hours; outside the summer months the window itself is classed
/// intermediate. Everything else is off-peak.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// First hour of the peak window (0-23, inclusive).
    pub peak_start_hour: u8,
    /// End of the peak window (exclusive).
    pub peak_end_hour: u8,
    /// Intermediate hours on each side of the peak window.
    pub shoulder_hours: u8,
    /// First month of the summer pricing season (1-12, inclusive).
    pub summer_start_month: u8,
    /// Last month of the summer pricing season (inclusive).
    pub summer_end_month: u8,
    /// Whether weekends are entirely off-peak.
    pub weekend_off_peak: bool,
    /// Weekday of January 1 (0 = Monday .. 6 = Sunday).
    pub year_starts_on: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            peak_start_hour: 14,
            peak_end_hour: 19,
            shoulder_hours: 2,
            summer_start_month: 6,
            summer_end_month: 9,
            weekend_off_peak: true,
            year_starts_on: 2,
        }
    }
}

/// Synthetic demand profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Average hourly consumption (kWh).
    pub base_kwh: f32,
    /// Amplitude of the daily sinusoid (kWh).
    pub daily_amp_kwh: f32,
    /// Amplitude of the seasonal sinusoid (kWh).
    pub seasonal_amp_kwh: f32,
    /// Phase offset of the daily sinusoid (radians).
    pub phase_rad: f32,
    /// Gaussian noise standard deviation (kWh).
    pub noise_std: f32,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            base_kwh: 1.2,
            daily_amp_kwh: 0.8,
            seasonal_amp_kwh: 0.4,
            phase_rad: 1.2,
            noise_std: 0.1,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.storage_size"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a residential-scale system with
    /// realistic conversion losses.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            system: SystemConfig::default(),
            schedule: ScheduleConfig::default(),
            demand: DemandConfig::default(),
        }
    }

    /// Returns the lossless preset: same system with ideal conversion,
    /// useful for checking energy bookkeeping by hand.
    pub fn lossless() -> Self {
        Self {
            system: SystemConfig {
                battery_efficiency: Efficiency::IDEAL,
                inverter_efficiency: Efficiency::IDEAL,
                ..SystemConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the undersized preset: a small battery that is exhausted on
    /// most peak days, exercising the battery-and-grid mode heavily.
    pub fn undersized() -> Self {
        Self {
            system: SystemConfig {
                storage_size: 6.0,
                battery_depleted_floor: 1.2,
                max_charge_rate: 2.0,
                ..SystemConfig::default()
            },
            demand: DemandConfig {
                base_kwh: 2.0,
                daily_amp_kwh: 1.2,
                ..DemandConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "lossless", "undersized"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "lossless" => Ok(Self::lossless()),
            "undersized" => Ok(Self::undersized()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.simulation.hours == 0 {
            errors.push(ConfigError {
                field: "simulation.hours".into(),
                message: "must be > 0".into(),
            });
        }

        let sys = &self.system;
        if sys.storage_size <= 0.0 {
            errors.push(ConfigError {
                field: "system.storage_size".into(),
                message: "must be > 0".into(),
            });
        }
        if sys.battery_depleted_floor < 0.0 || sys.battery_depleted_floor >= sys.storage_size {
            errors.push(ConfigError {
                field: "system.battery_depleted_floor".into(),
                message: "must be in [0, storage_size)".into(),
            });
        }
        if sys.max_charge_rate < 0.0 {
            errors.push(ConfigError {
                field: "system.max_charge_rate".into(),
                message: "must be >= 0".into(),
            });
        }
        for (field, value) in [
            ("system.battery_efficiency.charging", sys.battery_efficiency.charging),
            (
                "system.battery_efficiency.discharging",
                sys.battery_efficiency.discharging,
            ),
            (
                "system.inverter_efficiency.charging",
                sys.inverter_efficiency.charging,
            ),
            (
                "system.inverter_efficiency.discharging",
                sys.inverter_efficiency.discharging,
            ),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in (0, 1]".into(),
                });
            }
        }

        let sch = &self.schedule;
        if sch.peak_start_hour >= sch.peak_end_hour {
            errors.push(ConfigError {
                field: "schedule.peak_start_hour".into(),
                message: "must be < schedule.peak_end_hour".into(),
            });
        }
        if sch.peak_end_hour > 24 {
            errors.push(ConfigError {
                field: "schedule.peak_end_hour".into(),
                message: "must be <= 24".into(),
            });
        }
        if sch.peak_start_hour < sch.shoulder_hours
            || sch.peak_end_hour as usize + sch.shoulder_hours as usize > 24
        {
            errors.push(ConfigError {
                field: "schedule.shoulder_hours".into(),
                message: "shoulder window must fit within the day".into(),
            });
        }
        if !(1..=12).contains(&sch.summer_start_month)
            || !(1..=12).contains(&sch.summer_end_month)
        {
            errors.push(ConfigError {
                field: "schedule.summer_start_month".into(),
                message: "months must be in 1..=12".into(),
            });
        } else if sch.summer_start_month > sch.summer_end_month {
            errors.push(ConfigError {
                field: "schedule.summer_start_month".into(),
                message: "must be <= schedule.summer_end_month".into(),
            });
        }
        if sch.year_starts_on > 6 {
            errors.push(ConfigError {
                field: "schedule.year_starts_on".into(),
                message: "must be in 0..=6 (0 = Monday)".into(),
            });
        }

        let dem = &self.demand;
        if dem.base_kwh < 0.0 {
            errors.push(ConfigError {
                field: "demand.base_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if dem.noise_std < 0.0 {
            errors.push(ConfigError {
                field: "demand.noise_std".into(),
                message: "must be >= 0".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
hours = 8760
seed = 7

[system]
storage_size = 12.0
battery_depleted_floor = 2.4
max_charge_rate = 4.0
battery_efficiency = { charging = 0.92, discharging = 0.92 }
inverter_efficiency = { charging = 0.96, discharging = 0.96 }

[schedule]
peak_start_hour = 15
peak_end_hour = 20
shoulder_hours = 1
summer_start_month = 5
summer_end_month = 10
weekend_off_peak = true
year_starts_on = 0

[demand]
base_kwh = 1.5
daily_amp_kwh = 0.9
seasonal_amp_kwh = 0.5
phase_rad = 0.0
noise_std = 0.05
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.system.storage_size), Some(12.0));
        assert_eq!(cfg.as_ref().map(|c| c.schedule.peak_start_hour), Some(15));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(7));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[system]
storage_size = 30.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.system.storage_size), Some(30.0));
        // untouched sections keep their defaults
        assert_eq!(
            cfg.as_ref().map(|c| c.simulation.hours),
            Some(HOURS_PER_YEAR)
        );
        assert_eq!(cfg.as_ref().map(|c| c.schedule.peak_start_hour), Some(14));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[system]
storage_size = 10.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_floor_at_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.battery_depleted_floor = cfg.system.storage_size;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "system.battery_depleted_floor")
        );
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.inverter_efficiency.charging = 1.5;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "system.inverter_efficiency.charging")
        );
    }

    #[test]
    fn validation_catches_inverted_peak_window() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.schedule.peak_start_hour = 20;
        cfg.schedule.peak_end_hour = 14;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "schedule.peak_start_hour"));
    }

    #[test]
    fn validation_catches_overflowing_shoulder() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.schedule.peak_end_hour = 23;
        cfg.schedule.shoulder_hours = 3;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "schedule.shoulder_hours"));
    }

    #[test]
    fn validation_catches_bad_month() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.schedule.summer_start_month = 0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "schedule.summer_start_month")
        );
    }

    #[test]
    fn system_config_converts_to_parameters() {
        let cfg = ScenarioConfig::baseline();
        let params = cfg.system.to_parameters();
        assert_eq!(params.storage_size, cfg.system.storage_size);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn undersized_has_smaller_battery() {
        let base = ScenarioConfig::baseline();
        let small = ScenarioConfig::undersized();
        assert!(small.system.storage_size < base.system.storage_size);
    }

    #[test]
    fn lossless_has_ideal_efficiencies() {
        let cfg = ScenarioConfig::lossless();
        assert_eq!(cfg.system.battery_efficiency.charging, 1.0);
        assert_eq!(cfg.system.inverter_efficiency.discharging, 1.0);
    }
}
