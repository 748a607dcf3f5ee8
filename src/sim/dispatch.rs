//! Hourly dispatch rules: solar-first allocation, tier-gated battery use.
//!
//! Each hour is resolved independently from the current hour's inputs and the
//! battery's current state. Solar always serves the load first; surplus goes
//! to the battery (or is curtailed, since no export path is modeled); a
//! deficit is closed by battery discharge when the price tier justifies it,
//! with grid import covering the remainder.

use crate::battery::BatteryState;
use crate::config::DispatchPolicy;
use crate::tariff::{self, PriceTier};

use super::types::DecisionType;

/// Flows below this are treated as zero when classifying (kWh).
const FLOW_EPS: f32 = 1e-6;

/// Energy flows resolved for a single hour (all kWh, all non-negative).
#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyFlows {
    /// Solar energy serving the load directly.
    pub solar_to_load: f32,
    /// Solar energy accepted by the battery.
    pub battery_charge: f32,
    /// Solar energy with nowhere to go.
    pub solar_curtailed: f32,
    /// Battery energy delivered to the load.
    pub battery_discharge: f32,
    /// Energy imported from the grid.
    pub grid_import: f32,
}

/// One hour's dispatch: flows, category, and the explanation text.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub flows: HourlyFlows,
    pub decision: DecisionType,
    pub explanation: String,
}

/// Resolves the dispatch decision for one hour and advances battery state.
///
/// Negative upstream load or solar values are data errors and are clamped to
/// zero rather than propagated. The battery's SOC is mutated at most once,
/// through either `charge` or `discharge`, never both.
pub fn dispatch_hour(
    hour: usize,
    load_kwh: f32,
    solar_kwh: f32,
    battery: &mut BatteryState,
    policy: &DispatchPolicy,
) -> DispatchOutcome {
    let load = load_kwh.max(0.0);
    let solar = solar_kwh.max(0.0);

    let price = tariff::price_per_kwh(hour);
    let tier = tariff::tier(hour);
    let soc_before_pct = battery.soc_pct();

    let mut flows = HourlyFlows {
        solar_to_load: solar.min(load),
        ..HourlyFlows::default()
    };
    let surplus = solar - flows.solar_to_load;
    let deficit = load - flows.solar_to_load;

    if surplus > 0.0 {
        // Store meaningful surplus; anything the battery cannot take is lost.
        if surplus > policy.surplus_tolerance_kwh {
            flows.battery_charge = battery.charge(surplus);
        }
        flows.solar_curtailed = surplus - flows.battery_charge;
    } else if deficit > 0.0 {
        // Peak hours always justify discharge; cheaper tiers only spend
        // energy held above the reserve band.
        let discharge_allowed = tier == PriceTier::Peak || battery.soc > policy.reserve_soc;
        if discharge_allowed {
            flows.battery_discharge = battery.discharge(deficit);
        }
        flows.grid_import = (deficit - flows.battery_discharge).max(0.0);
    }

    let decision = classify(&flows, surplus, deficit);
    let explanation = explain(
        decision,
        &flows,
        load,
        solar,
        price,
        tier,
        soc_before_pct,
        battery.soc_pct(),
    );

    DispatchOutcome {
        flows,
        decision,
        explanation,
    }
}

/// Maps the resolved flows to the single category emitted for the hour.
fn classify(flows: &HourlyFlows, surplus: f32, deficit: f32) -> DecisionType {
    if deficit <= FLOW_EPS {
        if flows.solar_to_load <= FLOW_EPS && surplus <= FLOW_EPS {
            // Zero-load, zero-solar hour: nothing flows.
            return DecisionType::GridSupply;
        }
        if flows.battery_charge > FLOW_EPS {
            return DecisionType::SolarToBattery;
        }
        return DecisionType::SolarOnly;
    }
    if flows.battery_discharge > FLOW_EPS {
        if flows.solar_to_load > FLOW_EPS && flows.grid_import <= FLOW_EPS {
            return DecisionType::SolarAndBattery;
        }
        return DecisionType::BatteryDischarge;
    }
    if flows.solar_to_load > FLOW_EPS {
        return DecisionType::SolarAndGrid;
    }
    DecisionType::GridSupply
}

/// Renders the fixed explanation template for the chosen category.
#[expect(clippy::too_many_arguments)]
fn explain(
    decision: DecisionType,
    flows: &HourlyFlows,
    load: f32,
    solar: f32,
    price: f32,
    tier: PriceTier,
    soc_before_pct: f32,
    soc_after_pct: f32,
) -> String {
    match decision {
        DecisionType::SolarOnly => {
            if flows.solar_curtailed > FLOW_EPS {
                format!(
                    "Solar covers the full {load:.2} kWh load; {:.2} kWh of surplus \
                     is curtailed with the battery at {soc_after_pct:.1}%.",
                    flows.solar_curtailed
                )
            } else {
                format!(
                    "Solar generation of {solar:.2} kWh covers the {load:.2} kWh load; \
                     battery and grid stay idle."
                )
            }
        }
        DecisionType::SolarToBattery => {
            let curtail_note = if flows.solar_curtailed > FLOW_EPS {
                format!("; {:.2} kWh curtailed", flows.solar_curtailed)
            } else {
                String::new()
            };
            format!(
                "Solar covers the {load:.2} kWh load and charges the battery with \
                 {:.2} kWh of surplus (SoC {soc_before_pct:.1}% to {soc_after_pct:.1}%)\
                 {curtail_note}.",
                flows.battery_charge
            )
        }
        DecisionType::BatteryDischarge => format!(
            "Battery discharges {:.2} kWh against the {tier} price of ${price:.3}/kWh \
             (SoC {soc_before_pct:.1}% to {soc_after_pct:.1}%); grid covers the last \
             {:.2} kWh.",
            flows.battery_discharge, flows.grid_import
        ),
        DecisionType::SolarAndBattery => format!(
            "Solar supplies {:.2} kWh and the battery delivers the remaining {:.2} kWh \
             (SoC {soc_before_pct:.1}% to {soc_after_pct:.1}%); no grid import needed.",
            flows.solar_to_load, flows.battery_discharge
        ),
        DecisionType::SolarAndGrid => format!(
            "Solar supplies {:.2} kWh; grid imports the remaining {:.2} kWh at the \
             {tier} price of ${price:.3}/kWh (battery held at {soc_after_pct:.1}%).",
            flows.solar_to_load, flows.grid_import
        ),
        DecisionType::GridSupply => format!(
            "Grid supplies the full {load:.2} kWh at the {tier} price of \
             ${price:.3}/kWh; no solar and the battery stays at {soc_after_pct:.1}%."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatteryConfig;

    fn battery_at(soc: f32) -> BatteryState {
        BatteryState::from_config(&BatteryConfig {
            initial_soc: soc,
            ..BatteryConfig::default()
        })
    }

    fn policy() -> DispatchPolicy {
        DispatchPolicy::default()
    }

    #[test]
    fn solar_only_when_surplus_is_negligible() {
        let mut battery = battery_at(0.5);
        // Hour 12 is peak; solar barely exceeds load.
        let out = dispatch_hour(12, 3.0, 3.02, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::SolarOnly);
        assert_eq!(out.flows.grid_import, 0.0);
        assert_eq!(out.flows.battery_charge, 0.0);
        assert_eq!(out.flows.battery_discharge, 0.0);
        assert_eq!(battery.soc, 0.5);
    }

    #[test]
    fn surplus_charges_battery() {
        let mut battery = battery_at(0.5);
        let out = dispatch_hour(10, 2.0, 4.5, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::SolarToBattery);
        assert!((out.flows.battery_charge - 2.5).abs() < 1e-5);
        assert_eq!(out.flows.grid_import, 0.0);
        assert!(battery.soc > 0.5);
        assert!(out.explanation.contains("charges the battery"));
    }

    #[test]
    fn surplus_beyond_headroom_is_curtailed() {
        let mut battery = battery_at(0.9);
        // Headroom is (0.95-0.9)*10/0.95 = 0.5263 kWh; surplus is 3.
        let out = dispatch_hour(12, 2.0, 5.0, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::SolarToBattery);
        assert!((out.flows.battery_charge - 0.5263).abs() < 1e-3);
        assert!((out.flows.solar_curtailed - (3.0 - 0.5263)).abs() < 1e-3);
        assert!((battery.soc - 0.95).abs() < 1e-5);
    }

    #[test]
    fn full_battery_with_surplus_resolves_to_solar_only() {
        let mut battery = battery_at(0.95);
        let out = dispatch_hour(12, 2.0, 5.0, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::SolarOnly);
        assert!((out.flows.solar_curtailed - 3.0).abs() < 1e-5);
        assert_eq!(battery.soc, 0.95);
        assert!(out.explanation.contains("curtailed"));
    }

    #[test]
    fn peak_deficit_discharges_with_grid_remainder() {
        let mut battery = battery_at(0.5);
        // Hour 18 is peak. Deficit 3; only (0.5-0.2)*10 = 3 kWh in the cells,
        // delivering 3 * 0.95 = 2.85 kWh.
        let out = dispatch_hour(18, 4.0, 1.0, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::BatteryDischarge);
        assert!((out.flows.battery_discharge - 2.85).abs() < 1e-4);
        assert!((out.flows.grid_import - 0.15).abs() < 1e-4);
        assert!((battery.soc - 0.2).abs() < 1e-5);
    }

    #[test]
    fn peak_deficit_fully_covered_is_solar_and_battery() {
        let mut battery = battery_at(0.5);
        let out = dispatch_hour(18, 2.0, 1.0, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::SolarAndBattery);
        assert!((out.flows.battery_discharge - 1.0).abs() < 1e-4);
        assert!(out.flows.grid_import < 1e-5);
    }

    #[test]
    fn off_peak_deficit_preserves_battery() {
        let mut battery = battery_at(0.5);
        // Hour 2 is off-peak and SOC is below the reserve threshold.
        let out = dispatch_hour(2, 2.0, 0.5, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::SolarAndGrid);
        assert_eq!(out.flows.battery_discharge, 0.0);
        assert!((out.flows.grid_import - 1.5).abs() < 1e-5);
        assert_eq!(battery.soc, 0.5);
        assert!(out.explanation.contains("battery held"));
    }

    #[test]
    fn off_peak_deficit_spends_energy_above_reserve() {
        let mut battery = battery_at(0.9);
        let out = dispatch_hour(2, 2.0, 0.5, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::SolarAndBattery);
        assert!((out.flows.battery_discharge - 1.5).abs() < 1e-4);
        assert!(out.flows.grid_import < 1e-5);
        assert!(battery.soc < 0.9);
    }

    #[test]
    fn no_solar_no_usable_battery_is_grid_supply() {
        let mut battery = battery_at(0.2);
        // Hour 20 is peak but the battery sits at its floor.
        let out = dispatch_hour(20, 3.8, 0.0, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::GridSupply);
        assert!((out.flows.grid_import - 3.8).abs() < 1e-5);
        assert_eq!(out.flows.battery_discharge, 0.0);
        assert_eq!(battery.soc, 0.2);
    }

    #[test]
    fn full_battery_supply_without_solar_is_battery_discharge() {
        let mut battery = battery_at(0.5);
        let out = dispatch_hour(20, 2.0, 0.0, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::BatteryDischarge);
        assert!((out.flows.battery_discharge - 2.0).abs() < 1e-4);
        assert!(out.flows.grid_import < 1e-5);
    }

    #[test]
    fn negative_upstream_values_are_clamped() {
        let mut battery = battery_at(0.5);
        let out = dispatch_hour(3, -1.0, -2.0, &mut battery, &policy());
        assert_eq!(out.decision, DecisionType::GridSupply);
        assert_eq!(out.flows.grid_import, 0.0);
        assert_eq!(out.flows.solar_to_load, 0.0);
        assert_eq!(battery.soc, 0.5);
    }

    #[test]
    fn charge_and_discharge_never_both_nonzero() {
        for hour in 0..24 {
            for (load, solar) in [(0.0, 0.0), (2.0, 5.0), (4.0, 1.0), (3.0, 3.0)] {
                let mut battery = battery_at(0.5);
                let out = dispatch_hour(hour, load, solar, &mut battery, &policy());
                assert!(
                    out.flows.battery_charge == 0.0 || out.flows.battery_discharge == 0.0,
                    "hour {hour}: charge {} and discharge {} both set",
                    out.flows.battery_charge,
                    out.flows.battery_discharge
                );
            }
        }
    }

    #[test]
    fn energy_balance_holds_for_every_outcome() {
        for hour in 0..24 {
            for (load, solar) in [(0.8, 0.0), (2.5, 4.8), (4.5, 1.0), (2.0, 2.0)] {
                let mut battery = battery_at(0.6);
                let out = dispatch_hour(hour, load, solar, &mut battery, &policy());
                let supplied = out.flows.solar_to_load
                    + out.flows.battery_discharge
                    + out.flows.grid_import;
                assert!(
                    (supplied - load).abs() < 1e-4,
                    "hour {hour}: supplied {supplied} vs load {load}"
                );
                let solar_out = out.flows.solar_to_load
                    + out.flows.battery_charge
                    + out.flows.solar_curtailed;
                assert!(
                    (solar_out - solar).abs() < 1e-4,
                    "hour {hour}: solar accounted {solar_out} vs {solar}"
                );
            }
        }
    }
}
