//! Time-of-use tariff and grid carbon lookup.

use std::fmt;

use serde::Serialize;

use crate::profiles::HOURS_PER_DAY;

/// Fixed hourly grid import price ($/kWh).
///
/// Three-tier time-of-use schedule: cheap overnight, mid-priced morning and
/// late-afternoon shoulders, expensive midday and evening peaks.
const PRICE_PROFILE_USD_PER_KWH: [f32; HOURS_PER_DAY] = [
    0.08, 0.08, 0.08, 0.08, 0.09, 0.09, 0.10, // off-peak overnight
    0.15, 0.18, 0.18, // morning shoulder
    0.25, 0.28, 0.30, 0.28, 0.25, // midday peak
    0.18, 0.20, 0.22, // afternoon shoulder
    0.32, 0.35, 0.33, 0.30, // evening peak
    0.15, 0.10, // wind-down
];

/// Price tier for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    OffPeak,
    Shoulder,
    Peak,
}

impl PriceTier {
    /// Human-readable tier label used in explanations.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::OffPeak => "off-peak",
            PriceTier::Shoulder => "shoulder",
            PriceTier::Peak => "peak",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the grid import price for the given hour ($/kWh).
pub fn price_per_kwh(hour: usize) -> f32 {
    PRICE_PROFILE_USD_PER_KWH[hour % HOURS_PER_DAY]
}

/// Returns the price tier for the given hour.
pub fn tier(hour: usize) -> PriceTier {
    match hour % HOURS_PER_DAY {
        0..=6 | 23 => PriceTier::OffPeak,
        7..=9 | 15..=17 | 22 => PriceTier::Shoulder,
        _ => PriceTier::Peak,
    }
}

/// Mean price over the whole day ($/kWh), used in explanation text.
pub fn daily_average_price() -> f32 {
    PRICE_PROFILE_USD_PER_KWH.iter().sum::<f32>() / HOURS_PER_DAY as f32
}
