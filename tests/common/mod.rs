//! Shared test fixtures for integration tests.

use microgrid_sim::config::{BatteryConfig, ScenarioConfig};

/// Default scenario (6 kW PV, 10 kWh battery at 50%, uncertainty off).
pub fn default_config() -> ScenarioConfig {
    ScenarioConfig::baseline()
}

/// No-generation scenario: zero PV, battery pinned at its 20% floor.
pub fn grid_only_config() -> ScenarioConfig {
    ScenarioConfig {
        solar_capacity: 0.0,
        battery: BatteryConfig {
            min_soc: 0.2,
            initial_soc: 0.2,
            ..BatteryConfig::default()
        },
        ..ScenarioConfig::baseline()
    }
}

/// Weather-uncertainty scenario with a 20% error band and a fixed seed.
pub fn uncertain_config(seed: u64) -> ScenarioConfig {
    ScenarioConfig {
        enable_weather_uncertainty: true,
        forecast_error_range: 0.20,
        seed: Some(seed),
        ..ScenarioConfig::baseline()
    }
}
