//! Forecast-vs-actual deviation accounting for uncertainty-enabled runs.

use super::dispatch::HourlyFlows;

/// Deviation of realized solar from the forecast for one hour.
#[derive(Debug, Clone)]
pub struct ForecastDeviation {
    /// Relative error in percent; zero when the forecast is zero.
    pub error_pct: f32,
    /// Compensation note, present only when the error exceeds tolerance.
    pub correction: Option<String>,
}

/// Evaluates the forecast deviation after the hour has been dispatched.
///
/// Dispatch runs on the realized curve, so the compensating flows are already
/// part of `flows`; this records what changed relative to the forecast.
/// Deviations within `tolerance_pct` are absorbed silently.
pub fn evaluate(
    forecast_kwh: f32,
    actual_kwh: f32,
    flows: &HourlyFlows,
    tolerance_pct: f32,
) -> ForecastDeviation {
    if forecast_kwh <= 0.0 {
        return ForecastDeviation {
            error_pct: 0.0,
            correction: None,
        };
    }

    let error_pct = (actual_kwh - forecast_kwh) / forecast_kwh * 100.0;
    if error_pct.abs() <= tolerance_pct {
        return ForecastDeviation {
            error_pct,
            correction: None,
        };
    }

    let delta = (actual_kwh - forecast_kwh).abs();
    let correction = if actual_kwh < forecast_kwh {
        Some(format!(
            "Solar under-delivered by {delta:.2} kWh ({error_pct:.1}%); shortfall \
             closed within the hour by {:.2} kWh battery discharge and {:.2} kWh \
             grid import.",
            flows.battery_discharge, flows.grid_import
        ))
    } else {
        Some(format!(
            "Solar over-delivered by {delta:.2} kWh (+{error_pct:.1}%); battery \
             absorbed {:.2} kWh of the extra and {:.2} kWh was curtailed.",
            flows.battery_charge, flows.solar_curtailed
        ))
    };

    ForecastDeviation {
        error_pct,
        correction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flows(discharge: f32, grid: f32, charge: f32, curtailed: f32) -> HourlyFlows {
        HourlyFlows {
            solar_to_load: 0.0,
            battery_charge: charge,
            solar_curtailed: curtailed,
            battery_discharge: discharge,
            grid_import: grid,
        }
    }

    #[test]
    fn zero_forecast_yields_zero_error_and_no_note() {
        let dev = evaluate(0.0, 0.0, &flows(0.0, 0.0, 0.0, 0.0), 5.0);
        assert_eq!(dev.error_pct, 0.0);
        assert!(dev.correction.is_none());
    }

    #[test]
    fn deviation_within_tolerance_is_silent() {
        let dev = evaluate(4.0, 4.1, &flows(0.0, 0.0, 0.0, 0.0), 5.0);
        assert!((dev.error_pct - 2.5).abs() < 1e-4);
        assert!(dev.correction.is_none());
    }

    #[test]
    fn under_generation_names_the_compensating_flows() {
        let dev = evaluate(4.0, 3.0, &flows(0.6, 0.4, 0.0, 0.0), 5.0);
        assert!((dev.error_pct - -25.0).abs() < 1e-3);
        let note = dev.correction.as_deref();
        assert!(note.is_some());
        let note = note.unwrap_or_default();
        assert!(note.contains("under-delivered"));
        assert!(note.contains("0.60 kWh battery discharge"));
        assert!(note.contains("0.40 kWh"));
    }

    #[test]
    fn over_generation_names_absorption_and_curtailment() {
        let dev = evaluate(4.0, 5.0, &flows(0.0, 0.0, 0.8, 0.2), 5.0);
        assert!((dev.error_pct - 25.0).abs() < 1e-3);
        let note = dev.correction.as_deref().unwrap_or_default();
        assert!(note.contains("over-delivered"));
        assert!(note.contains("absorbed 0.80 kWh"));
        assert!(note.contains("0.20 kWh was curtailed"));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let dev = evaluate(4.0, 4.2, &flows(0.0, 0.0, 0.0, 0.0), 5.0);
        assert!((dev.error_pct - 5.0).abs() < 1e-3);
        assert!(dev.correction.is_none());
    }
}
