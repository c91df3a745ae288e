//! Synthetic hourly demand profile for driving full-year simulations.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::DemandConfig;

/// Hours in the seasonal cycle.
const HOURS_PER_YEAR_F: f32 = 8760.0;

/// A demand generator modeling daily and seasonal consumption patterns.
///
/// `DemandProfile` combines a baseline, a daily sinusoid, a seasonal
/// sinusoid peaking in winter, and seeded Gaussian noise. Output is clamped
/// non-negative and fully reproducible for a fixed seed.
#[derive(Debug, Clone)]
pub struct DemandProfile {
    /// Average hourly consumption in kWh.
    pub base_kwh: f32,
    /// Amplitude of the daily sinusoid in kWh.
    pub daily_amp_kwh: f32,
    /// Amplitude of the seasonal sinusoid in kWh.
    pub seasonal_amp_kwh: f32,
    /// Phase offset of the daily sinusoid in radians.
    pub phase_rad: f32,
    /// Standard deviation of the Gaussian noise in kWh.
    pub noise_std: f32,
    rng: StdRng,
}

impl DemandProfile {
    /// Creates a profile from configuration with a reproducible seed.
    pub fn from_config(config: &DemandConfig, seed: u64) -> Self {
        Self {
            base_kwh: config.base_kwh,
            daily_amp_kwh: config.daily_amp_kwh,
            seasonal_amp_kwh: config.seasonal_amp_kwh,
            phase_rad: config.phase_rad,
            noise_std: config.noise_std,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Demand for one hour of the year, in kWh.
    ///
    /// Draws one noise sample per call, so hours must be generated in
    /// order for reproducibility; use [`DemandProfile::year`] for a full
    /// series.
    pub fn hourly_kwh(&mut self, hour: usize) -> f32 {
        let day_pos = (hour % 24) as f32 / 24.0; // [0, 1)
        let daily = (2.0 * std::f32::consts::PI * day_pos + self.phase_rad).sin();

        // Winter-peaking seasonal component: maximum at the start of the year.
        let year_pos = (hour as f32 / HOURS_PER_YEAR_F).fract();
        let seasonal = (2.0 * std::f32::consts::PI * year_pos).cos();

        let noise = if self.noise_std > 0.0 {
            // simple Gaussian-ish noise via Box-Muller
            let u1: f32 = self.rng.random::<f32>().clamp(1e-6, 1.0);
            let u2: f32 = self.rng.random::<f32>();
            let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
            z0 * self.noise_std
        } else {
            0.0
        };

        let kwh = self.base_kwh + self.daily_amp_kwh * daily + self.seasonal_amp_kwh * seasonal
            + noise;
        kwh.max(0.0) // no negative demand
    }

    /// Generates the full hourly series.
    pub fn year(&mut self, hours: usize) -> Vec<f32> {
        (0..hours).map(|h| self.hourly_kwh(h)).collect()
    }
}
