//! Battery energy storage state and hourly charge/discharge physics.

use crate::config::BatteryConfig;

/// Mutable battery state owned by one simulation run.
///
/// `BatteryState` copies its limits from [`BatteryConfig`] at initialization
/// and tracks the state of charge (SOC) across the hour loop. SOC is kept
/// inside the `[min_soc, max_soc]` band at all times; rounding that would
/// push it outside is clamped back to the boundary.
///
/// With one-hour dispatch intervals the kW rate limits bound kWh per hour
/// directly.
#[derive(Debug, Clone)]
pub struct BatteryState {
    /// Total energy capacity in kilowatt-hours.
    pub capacity_kwh: f32,

    /// Lowest SOC the dispatcher may drain to (fraction).
    pub min_soc: f32,

    /// Highest SOC the dispatcher may fill to (fraction).
    pub max_soc: f32,

    /// Maximum charge power in kilowatts (positive value).
    pub max_charge_kw: f32,

    /// Maximum discharge power in kilowatts (positive value).
    pub max_discharge_kw: f32,

    /// Round-trip efficiency, applied per charge or discharge event (0..1.0).
    pub efficiency: f32,

    /// State of charge as a fraction (min_soc..=max_soc).
    pub soc: f32,
}

impl BatteryState {
    /// Builds the run-local battery state from validated configuration.
    pub fn from_config(cfg: &BatteryConfig) -> Self {
        Self {
            capacity_kwh: cfg.capacity,
            min_soc: cfg.min_soc,
            max_soc: cfg.max_soc,
            max_charge_kw: cfg.max_charge_rate,
            max_discharge_kw: cfg.max_discharge_rate,
            efficiency: cfg.efficiency,
            soc: cfg.initial_soc.clamp(cfg.min_soc, cfg.max_soc),
        }
    }

    /// Current state of charge as a percentage (0-100).
    pub fn soc_pct(&self) -> f32 {
        self.soc * 100.0
    }

    /// Input energy the battery can accept this hour (kWh).
    ///
    /// Limited by both the remaining headroom below `max_soc` (inflated by
    /// the charge-side efficiency loss) and the charge rate.
    pub fn charge_headroom_kwh(&self) -> f32 {
        let space_kwh = (self.max_soc - self.soc).max(0.0) * self.capacity_kwh;
        (space_kwh / self.efficiency).min(self.max_charge_kw)
    }

    /// Stored energy the battery can draw down this hour (kWh).
    ///
    /// Limited by both the energy above `min_soc` and the discharge rate.
    pub fn discharge_headroom_kwh(&self) -> f32 {
        let stored_kwh = (self.soc - self.min_soc).max(0.0) * self.capacity_kwh;
        stored_kwh.min(self.max_discharge_kw)
    }

    /// Charges with up to `offered_kwh` of input energy.
    ///
    /// Returns the energy actually taken from the source (may be less due to
    /// rate or SOC limits). The stored amount is reduced by the efficiency
    /// factor.
    pub fn charge(&mut self, offered_kwh: f32) -> f32 {
        if offered_kwh <= 0.0 {
            return 0.0;
        }
        let accepted = offered_kwh.min(self.charge_headroom_kwh());
        self.soc += accepted * self.efficiency / self.capacity_kwh;
        self.clamp_soc();
        accepted
    }

    /// Discharges to deliver up to `demand_kwh` to the load.
    ///
    /// Returns the energy actually delivered (may be less due to rate or SOC
    /// limits). The cells are drawn down by `delivered / efficiency`.
    pub fn discharge(&mut self, demand_kwh: f32) -> f32 {
        if demand_kwh <= 0.0 {
            return 0.0;
        }
        let drawn = (demand_kwh / self.efficiency).min(self.discharge_headroom_kwh());
        let delivered = drawn * self.efficiency;
        self.soc -= drawn / self.capacity_kwh;
        self.clamp_soc();
        delivered
    }

    fn clamp_soc(&mut self) {
        self.soc = self.soc.clamp(self.min_soc, self.max_soc);
    }
}
