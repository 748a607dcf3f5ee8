//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`], deserialize from JSON through the
/// API, or use [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Solar PV array capacity (kW peak). Zero means no PV installed.
    pub solar_capacity: f32,
    /// Battery storage parameters.
    pub battery: BatteryConfig,
    /// Grid carbon intensity (kg CO2 per kWh imported).
    pub grid_carbon_intensity: f32,
    /// Perturb the solar forecast into a distinct "actual" curve.
    pub enable_weather_uncertainty: bool,
    /// Half-width of the per-hour forecast error band (fraction, 0.0-1.0).
    pub forecast_error_range: f32,
    /// Random seed for the weather sampler. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Dispatch policy thresholds.
    pub dispatch: DispatchPolicy,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            solar_capacity: 6.0,
            battery: BatteryConfig::default(),
            grid_carbon_intensity: 0.42,
            enable_weather_uncertainty: false,
            forecast_error_range: 0.15,
            seed: None,
            dispatch: DispatchPolicy::default(),
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (kWh).
    pub capacity: f32,
    /// Minimum state of charge the dispatcher may drain to (fraction).
    pub min_soc: f32,
    /// Maximum state of charge the dispatcher may fill to (fraction).
    pub max_soc: f32,
    /// Maximum charging power (kW).
    pub max_charge_rate: f32,
    /// Maximum discharging power (kW).
    pub max_discharge_rate: f32,
    /// Round-trip efficiency, applied per charge or discharge event (0.0-1.0).
    pub efficiency: f32,
    /// Initial state of charge (fraction, within the min/max band).
    pub initial_soc: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            min_soc: 0.2,
            max_soc: 0.95,
            max_charge_rate: 5.0,
            max_discharge_rate: 5.0,
            efficiency: 0.95,
            initial_soc: 0.5,
        }
    }
}

/// Dispatch policy thresholds.
///
/// These tune the tie-break between battery discharge and grid import; the
/// rule engine itself is fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchPolicy {
    /// SoC above which discharge is allowed outside peak hours (fraction).
    pub reserve_soc: f32,
    /// Solar surplus below this is treated as "no excess" (kWh).
    pub surplus_tolerance_kwh: f32,
    /// Forecast deviations within this band get no correction note (percent).
    pub forecast_tolerance_pct: f32,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            reserve_soc: 0.80,
            surplus_tolerance_kwh: 0.05,
            forecast_tolerance_pct: 5.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.min_soc"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (the documented request defaults).
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the overcast preset: weather uncertainty with a wide error band.
    pub fn overcast() -> Self {
        Self {
            enable_weather_uncertainty: true,
            forecast_error_range: 0.20,
            ..Self::default()
        }
    }

    /// Returns the grid-only preset: no PV, battery pinned at its floor.
    pub fn grid_only() -> Self {
        Self {
            solar_capacity: 0.0,
            battery: BatteryConfig {
                initial_soc: 0.2,
                ..BatteryConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "overcast", "grid_only"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "overcast" => Ok(Self::overcast()),
            "grid_only" => Ok(Self::grid_only()),
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
    /// Returns an empty vector if the configuration is physically consistent.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.solar_capacity < 0.0 || !self.solar_capacity.is_finite() {
            errors.push(ConfigError {
                field: "solar_capacity".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.grid_carbon_intensity <= 0.0 {
            errors.push(ConfigError {
                field: "grid_carbon_intensity".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.forecast_error_range) {
            errors.push(ConfigError {
                field: "forecast_error_range".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        let bat = &self.battery;
        if bat.capacity <= 0.0 {
            errors.push(ConfigError {
                field: "battery.capacity".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&bat.min_soc) {
            errors.push(ConfigError {
                field: "battery.min_soc".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(0.0..=1.0).contains(&bat.max_soc) {
            errors.push(ConfigError {
                field: "battery.max_soc".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if bat.min_soc >= bat.max_soc {
            errors.push(ConfigError {
                field: "battery.min_soc".into(),
                message: "must be < battery.max_soc".into(),
            });
        }
        if bat.max_charge_rate <= 0.0 {
            errors.push(ConfigError {
                field: "battery.max_charge_rate".into(),
                message: "must be > 0".into(),
            });
        }
        if bat.max_discharge_rate <= 0.0 {
            errors.push(ConfigError {
                field: "battery.max_discharge_rate".into(),
                message: "must be > 0".into(),
            });
        }
        if bat.efficiency <= 0.0 || bat.efficiency > 1.0 {
            errors.push(ConfigError {
                field: "battery.efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if bat.initial_soc < bat.min_soc || bat.initial_soc > bat.max_soc {
            errors.push(ConfigError {
                field: "battery.initial_soc".into(),
                message: "must be within [battery.min_soc, battery.max_soc]".into(),
            });
        }

        let d = &self.dispatch;
        if !(0.0..=1.0).contains(&d.reserve_soc) {
            errors.push(ConfigError {
                field: "dispatch.reserve_soc".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if d.surplus_tolerance_kwh < 0.0 {
            errors.push(ConfigError {
                field: "dispatch.surplus_tolerance_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if d.forecast_tolerance_pct < 0.0 {
            errors.push(ConfigError {
                field: "dispatch.forecast_tolerance_pct".into(),
                message: "must be >= 0".into(),
            });
        }

        errors
    }
}
