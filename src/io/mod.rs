/// CSV export for hourly simulation records.
pub mod export;
