//! Core result types: decision categories, hourly records, run summaries.

use std::fmt;

use serde::Serialize;

/// Dispatch decision category for one hour.
///
/// Exactly one category is emitted per hour; each variant names the set of
/// sources that served the load (or absorbed the surplus).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionType {
    /// Solar covers the load with no meaningful surplus.
    SolarOnly,
    /// Solar covers the load and the surplus charges the battery.
    SolarToBattery,
    /// Battery discharges against a deficit; grid covers any remainder.
    BatteryDischarge,
    /// Solar plus battery fully cover the load with no grid import.
    SolarAndBattery,
    /// Solar contributes; the rest is imported, battery held in reserve.
    SolarAndGrid,
    /// Grid serves the full load.
    GridSupply,
}

impl DecisionType {
    /// Wire-format label, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::SolarOnly => "SOLAR_ONLY",
            DecisionType::SolarToBattery => "SOLAR_TO_BATTERY",
            DecisionType::BatteryDischarge => "BATTERY_DISCHARGE",
            DecisionType::SolarAndBattery => "SOLAR_AND_BATTERY",
            DecisionType::SolarAndGrid => "SOLAR_AND_GRID",
            DecisionType::GridSupply => "GRID_SUPPLY",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats an hour index as a 12-hour clock label (e.g., `"8:00 AM"`).
pub fn time_label(hour: usize) -> String {
    match hour % 24 {
        0 => "12:00 AM".to_string(),
        h @ 1..=11 => format!("{h}:00 AM"),
        12 => "12:00 PM".to_string(),
        h => format!("{}:00 PM", h - 12),
    }
}

/// Complete record of one simulated hour, immutable once emitted.
///
/// The forecast fields are `None` when weather uncertainty is disabled;
/// serialized names follow the dashboard contract.
#[derive(Debug, Clone, Serialize)]
pub struct HourRecord {
    /// Hour index (0-23).
    pub hour: usize,
    /// 12-hour clock label.
    pub time: String,
    /// Load demand (kWh).
    pub load_kwh: f32,
    /// Solar generation used for dispatch this hour (kWh).
    pub solar_kwh: f32,
    /// Forecast solar output (kWh); `None` when uncertainty is disabled.
    #[serde(rename = "forecast_solar_kwh")]
    pub solar_forecast_kwh: Option<f32>,
    /// Realized solar output (kWh); `None` when uncertainty is disabled.
    #[serde(rename = "actual_solar_kwh")]
    pub solar_actual_kwh: Option<f32>,
    /// Energy imported from the grid (kWh).
    pub grid_import_kwh: f32,
    /// Solar energy routed into the battery (kWh).
    pub battery_charge_kwh: f32,
    /// Battery energy delivered to the load (kWh).
    pub battery_discharge_kwh: f32,
    /// State of charge after this hour's dispatch (percent).
    pub battery_soc_pct: f32,
    /// Dispatch decision category.
    pub decision_type: DecisionType,
    /// Human-readable account of the decision.
    pub explanation: String,
    /// Grid import cost this hour ($).
    pub cost_usd: f32,
    /// Grid import emissions this hour (kg CO2).
    pub co2_kg: f32,
    /// Relative forecast deviation (percent); `None` when uncertainty is disabled.
    pub forecast_error_pct: Option<f32>,
    /// Compensation note for deviations beyond tolerance.
    pub forecast_correction: Option<String>,
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>2} ({:>8}) | load={:>5.2} solar={:>5.2} | grid={:>5.2}  \
             chg={:>5.2}  dis={:>5.2}  SoC={:>5.1}% | ${:>6.4} {:>5.3} kg | {}",
            self.hour,
            self.time,
            self.load_kwh,
            self.solar_kwh,
            self.grid_import_kwh,
            self.battery_charge_kwh,
            self.battery_discharge_kwh,
            self.battery_soc_pct,
            self.cost_usd,
            self.co2_kg,
            self.decision_type,
        )
    }
}

/// Aggregate figures for one day of operation.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    /// Total load served (kWh).
    pub total_load_kwh: f32,
    /// Total solar generation realized (kWh).
    pub total_solar_kwh: f32,
    /// Total grid import (kWh).
    pub total_grid_import_kwh: f32,
    /// Share of load served by solar and battery (percent).
    pub renewable_usage_pct: f32,
    /// Grid emissions of the optimized run (kg CO2).
    pub total_emissions_kg: f32,
    /// Grid emissions of the grid-only baseline (kg CO2).
    pub baseline_emissions_kg: f32,
    /// One-sentence account of the savings outcome.
    pub explanation: String,
}

/// Complete simulation output: 24 hour records plus baseline comparison.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Hourly dispatch records, in hour order.
    pub hourly_results: Vec<HourRecord>,
    /// Cost of serving the whole load from the grid ($).
    pub baseline_total_cost: f32,
    /// Cost of the dispatched schedule ($).
    pub optimized_total_cost: f32,
    /// `baseline_total_cost - optimized_total_cost` ($).
    pub total_cost_savings: f32,
    /// Savings as a share of the baseline cost (percent).
    pub savings_percentage: f32,
    /// Daily aggregates.
    pub summary: DailySummary,
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Daily Summary ---")?;
        writeln!(f, "Baseline cost (grid-only): ${:.2}", self.baseline_total_cost)?;
        writeln!(f, "Optimized cost:            ${:.2}", self.optimized_total_cost)?;
        writeln!(
            f,
            "Savings:                   ${:.2} ({:.1}%)",
            self.total_cost_savings, self.savings_percentage
        )?;
        writeln!(
            f,
            "Renewable usage:           {:.1}%",
            self.summary.renewable_usage_pct
        )?;
        write!(
            f,
            "Grid emissions:            {:.2} kg CO2 (baseline {:.2} kg)",
            self.summary.total_emissions_kg, self.summary.baseline_emissions_kg
        )
    }
}
