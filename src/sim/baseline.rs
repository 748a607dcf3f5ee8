//! Grid-only reference policy for savings reporting.
//!
//! The baseline serves every hour's full load from the grid, with no solar
//! and no battery, over the same load and tariff tables the optimized run
//! uses. Stateless by construction.

use crate::profiles::{self, HOURS_PER_DAY};
use crate::tariff;

/// Total cost of serving the whole daily load from the grid ($).
pub fn total_cost() -> f32 {
    (0..HOURS_PER_DAY)
        .map(|h| profiles::load_kwh(h) * tariff::price_per_kwh(h))
        .sum()
}

/// Total grid emissions of the grid-only day (kg CO2).
pub fn total_emissions(grid_carbon_intensity: f32) -> f32 {
    profiles::total_daily_load_kwh() * grid_carbon_intensity
}
