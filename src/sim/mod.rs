/// Grid-only reference run for savings reporting.
pub mod baseline;
/// Forecast-vs-actual deviation accounting.
pub mod correction;
pub mod dispatch;
pub mod engine;
pub mod types;
