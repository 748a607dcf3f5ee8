//! CSV export for hourly simulation records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourRecord;

/// Column header for CSV telemetry export.
const HEADER: &str = "hour,time,load_kwh,solar_kwh,grid_import_kwh,\
                       battery_charge_kwh,battery_discharge_kwh,battery_soc_pct,\
                       decision_type,cost_usd,co2_kg,forecast_error_pct";

/// Exports hourly records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[HourRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes hourly records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[HourRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.hour.to_string(),
            r.time.clone(),
            format!("{:.3}", r.load_kwh),
            format!("{:.3}", r.solar_kwh),
            format!("{:.3}", r.grid_import_kwh),
            format!("{:.3}", r.battery_charge_kwh),
            format!("{:.3}", r.battery_discharge_kwh),
            format!("{:.1}", r.battery_soc_pct),
            r.decision_type.as_str().to_string(),
            format!("{:.4}", r.cost_usd),
            format!("{:.3}", r.co2_kg),
            r.forecast_error_pct
                .map(|e| format!("{e:.1}"))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
