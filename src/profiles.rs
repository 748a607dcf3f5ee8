//! Deterministic daily profiles: load demand, solar forecast, weather sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of dispatch intervals in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// First hour with solar production (inclusive).
const SUNRISE_HOUR: usize = 6;
/// First evening hour without solar production (exclusive bound).
const SUNSET_HOUR: usize = 20;
/// Energy yield per kW of array capacity at solar noon (kWh).
const PEAK_YIELD_KWH_PER_KW: f32 = 0.85;

/// Fixed hourly household load demand (kWh).
///
/// Low overnight, morning rise, moderate working-day plateau, evening peak,
/// hour-23 decline. Independent of any scenario parameter.
const LOAD_PROFILE_KWH: [f32; HOURS_PER_DAY] = [
    0.8, 0.6, 0.5, 0.5, 0.6, 1.0, // night
    2.0, 3.0, 2.5, // morning rise
    2.0, 2.2, 2.5, 2.8, 2.5, 2.3, 2.0, 2.2, // working day
    3.5, 4.5, 4.2, 3.8, 3.5, 3.0, // evening peak
    1.5, // decline
];

/// Returns the fixed load demand for the given hour (kWh).
pub fn load_kwh(hour: usize) -> f32 {
    LOAD_PROFILE_KWH[hour % HOURS_PER_DAY]
}

/// Total energy demand over one day (kWh).
pub fn total_daily_load_kwh() -> f32 {
    LOAD_PROFILE_KWH.iter().sum()
}

/// Returns the forecast solar output for the given hour (kWh).
///
/// A half-sine bell between sunrise and sunset, zero outside daylight,
/// scaled linearly by `solar_capacity`. Pure function of its arguments;
/// the same inputs always produce the same forecast.
pub fn solar_forecast_kwh(solar_capacity: f32, hour: usize) -> f32 {
    let h = hour % HOURS_PER_DAY;
    if h < SUNRISE_HOUR || h >= SUNSET_HOUR {
        return 0.0;
    }
    let span = (SUNSET_HOUR - SUNRISE_HOUR) as f32;
    // Sample at the middle of the hour so dawn and dusk are symmetric.
    let x = (h - SUNRISE_HOUR) as f32 + 0.5;
    let frac = (std::f32::consts::PI * x / span).sin();
    (solar_capacity.max(0.0) * PEAK_YIELD_KWH_PER_KW * frac).max(0.0)
}

/// Per-hour weather perturbation for uncertainty-enabled runs.
///
/// Draws a relative error uniformly from `[-error_range, +error_range]` and
/// applies it to the forecast. Seeded construction gives reproducible series
/// for tests; `None` seeds from OS entropy for run-to-run variation.
#[derive(Debug)]
pub struct WeatherSampler {
    rng: StdRng,
    error_range: f32,
}

impl WeatherSampler {
    /// Creates a sampler with the given error band and optional seed.
    pub fn new(error_range: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            error_range: error_range.clamp(0.0, 1.0),
        }
    }

    /// Returns the realized solar output for one hour (kWh, always >= 0).
    ///
    /// Hours without forecast production stay at zero and do not consume
    /// randomness, so daylight hours line up across equal-seed runs.
    pub fn perturb(&mut self, forecast_kwh: f32) -> f32 {
        if forecast_kwh <= 0.0 {
            return 0.0;
        }
        let eps = if self.error_range > 0.0 {
            self.rng.random_range(-self.error_range..=self.error_range)
        } else {
            0.0
        };
        (forecast_kwh * (1.0 + eps)).max(0.0)
    }
}
