//! Sequential 24-hour simulation run: dispatch, invariants, aggregation.

use tracing::{debug, info};

use crate::battery::BatteryState;
use crate::config::ScenarioConfig;
use crate::error::SimulationError;
use crate::profiles::{self, HOURS_PER_DAY, WeatherSampler};
use crate::tariff;

use super::baseline;
use super::correction;
use super::dispatch::{self, HourlyFlows};
use super::types::{DailySummary, HourRecord, SimulationResult, time_label};

/// Tolerance for the per-hour energy balance checks (kWh).
const BALANCE_EPS: f32 = 1e-3;
/// Slack allowed on the SOC band check to absorb float rounding.
const SOC_EPS: f32 = 1e-4;

/// Simulation engine owning the battery state for one run.
///
/// The hour loop is intrinsically sequential: SOC at hour `h` depends on the
/// outcome at `h - 1`. Separate runs own separate `Engine` instances and may
/// execute in parallel.
pub struct Engine {
    config: ScenarioConfig,
    battery: BatteryState,
}

impl Engine {
    /// Validates the scenario and builds an engine for one run.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] listing every violated constraint;
    /// no simulation step runs on an invalid configuration.
    pub fn new(config: ScenarioConfig) -> Result<Self, SimulationError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(SimulationError::from_config_errors(&errors));
        }
        let battery = BatteryState::from_config(&config.battery);
        Ok(Self { config, battery })
    }

    /// Runs all 24 hours and assembles the complete result.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Invariant`] if any hour's energy balance
    /// cannot be reconciled. No partial schedule is returned in that case.
    pub fn run(mut self) -> Result<SimulationResult, SimulationError> {
        let cfg = self.config.clone();
        let mut sampler = cfg
            .enable_weather_uncertainty
            .then(|| WeatherSampler::new(cfg.forecast_error_range, cfg.seed));

        let mut records = Vec::with_capacity(HOURS_PER_DAY);
        let mut optimized_cost = 0.0_f32;
        let mut total_load = 0.0_f32;
        let mut total_solar = 0.0_f32;
        let mut total_grid = 0.0_f32;
        let mut total_co2 = 0.0_f32;

        for hour in 0..HOURS_PER_DAY {
            let load = profiles::load_kwh(hour);
            let forecast = profiles::solar_forecast_kwh(cfg.solar_capacity, hour);
            let actual = match sampler.as_mut() {
                Some(s) => s.perturb(forecast),
                None => forecast,
            };

            let outcome =
                dispatch::dispatch_hour(hour, load, actual, &mut self.battery, &cfg.dispatch);

            self.check_invariants(hour, load, actual, &outcome.flows)?;

            let cost = outcome.flows.grid_import * tariff::price_per_kwh(hour);
            let co2 = outcome.flows.grid_import * cfg.grid_carbon_intensity;

            let (forecast_kwh, actual_kwh, error_pct, correction_note) =
                if cfg.enable_weather_uncertainty {
                    let dev = correction::evaluate(
                        forecast,
                        actual,
                        &outcome.flows,
                        cfg.dispatch.forecast_tolerance_pct,
                    );
                    (
                        Some(forecast),
                        Some(actual),
                        Some(dev.error_pct),
                        dev.correction,
                    )
                } else {
                    (None, None, None, None)
                };

            debug!(
                hour,
                decision = outcome.decision.as_str(),
                grid_import_kwh = outcome.flows.grid_import,
                soc_pct = self.battery.soc_pct(),
                "dispatched hour"
            );

            records.push(HourRecord {
                hour,
                time: time_label(hour),
                load_kwh: load,
                solar_kwh: actual,
                solar_forecast_kwh: forecast_kwh,
                solar_actual_kwh: actual_kwh,
                grid_import_kwh: outcome.flows.grid_import,
                battery_charge_kwh: outcome.flows.battery_charge,
                battery_discharge_kwh: outcome.flows.battery_discharge,
                battery_soc_pct: self.battery.soc_pct(),
                decision_type: outcome.decision,
                explanation: outcome.explanation,
                cost_usd: cost,
                co2_kg: co2,
                forecast_error_pct: error_pct,
                forecast_correction: correction_note,
            });

            optimized_cost += cost;
            total_load += load;
            total_solar += actual;
            total_grid += outcome.flows.grid_import;
            total_co2 += co2;
        }

        let baseline_cost = baseline::total_cost();
        let savings = baseline_cost - optimized_cost;
        let savings_pct = if baseline_cost > 0.0 {
            savings / baseline_cost * 100.0
        } else {
            0.0
        };

        let renewable_pct = if total_load > 0.0 {
            ((total_load - total_grid) / total_load * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        info!(
            baseline_cost,
            optimized_cost, savings, renewable_pct, "simulation complete"
        );

        Ok(SimulationResult {
            hourly_results: records,
            baseline_total_cost: baseline_cost,
            optimized_total_cost: optimized_cost,
            total_cost_savings: savings,
            savings_percentage: savings_pct,
            summary: DailySummary {
                total_load_kwh: total_load,
                total_solar_kwh: total_solar,
                total_grid_import_kwh: total_grid,
                renewable_usage_pct: renewable_pct,
                total_emissions_kg: total_co2,
                baseline_emissions_kg: baseline::total_emissions(cfg.grid_carbon_intensity),
                explanation: savings_explanation(savings, savings_pct),
            },
        })
    }

    /// Verifies the hour's flows reconcile before the record is trusted.
    fn check_invariants(
        &self,
        hour: usize,
        load_kwh: f32,
        solar_kwh: f32,
        flows: &HourlyFlows,
    ) -> Result<(), SimulationError> {
        let load = load_kwh.max(0.0);
        let solar = solar_kwh.max(0.0);

        for (name, value) in [
            ("solar_to_load", flows.solar_to_load),
            ("battery_charge", flows.battery_charge),
            ("solar_curtailed", flows.solar_curtailed),
            ("battery_discharge", flows.battery_discharge),
            ("grid_import", flows.grid_import),
        ] {
            if value < 0.0 {
                return Err(SimulationError::Invariant {
                    hour,
                    detail: format!("{name} is negative ({value})"),
                });
            }
        }

        let supplied = flows.solar_to_load + flows.battery_discharge + flows.grid_import;
        if (supplied - load).abs() > BALANCE_EPS {
            return Err(SimulationError::Invariant {
                hour,
                detail: format!("supply {supplied:.4} kWh does not match load {load:.4} kWh"),
            });
        }

        let solar_accounted = flows.solar_to_load + flows.battery_charge + flows.solar_curtailed;
        if (solar_accounted - solar).abs() > BALANCE_EPS {
            return Err(SimulationError::Invariant {
                hour,
                detail: format!(
                    "solar accounted {solar_accounted:.4} kWh does not match generation \
                     {solar:.4} kWh"
                ),
            });
        }

        if flows.battery_charge > 0.0 && flows.battery_discharge > 0.0 {
            return Err(SimulationError::Invariant {
                hour,
                detail: "battery charged and discharged in the same hour".to_string(),
            });
        }

        let soc = self.battery.soc;
        if soc < self.battery.min_soc - SOC_EPS || soc > self.battery.max_soc + SOC_EPS {
            return Err(SimulationError::Invariant {
                hour,
                detail: format!(
                    "SOC {soc:.4} outside [{:.2}, {:.2}]",
                    self.battery.min_soc, self.battery.max_soc
                ),
            });
        }

        Ok(())
    }
}

/// One-sentence savings account, mirroring the dashboard's summary card.
fn savings_explanation(savings: f32, savings_pct: f32) -> String {
    if savings > 0.0 {
        format!(
            "Dispatch reduced the daily energy cost by {savings_pct:.1}% \
             (${savings:.2}) against a grid-only baseline."
        )
    } else if savings < 0.0 {
        format!(
            "Dispatched cost is ${:.2} above the grid-only baseline.",
            savings.abs()
        )
    } else {
        "Dispatched cost equals the grid-only baseline.".to_string()
    }
}

/// Validates and runs a scenario in one call.
///
/// # Errors
///
/// Propagates validation and invariant errors from [`Engine`].
pub fn run_simulation(config: ScenarioConfig) -> Result<SimulationResult, SimulationError> {
    Engine::new(config)?.run()
}
