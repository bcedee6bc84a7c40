//! CSV export for simulation step records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepRecord;

/// Columns present in every export, before the logged parameters.
const FIXED_COLUMNS: [&str; 4] = ["step", "time_s", "distance_m", "total_energy_j"];

/// Exports step records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Complete simulation step records
/// * `columns` - Logged parameter names, aligned with each record's values
/// * `path` - Output file path
///
/// # Errors
///
/// Returns a `csv::Error` if file creation or writing fails.
pub fn export_csv(records: &[StepRecord], columns: &[String], path: &Path) -> csv::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, columns, buf)
}

/// Writes step records as CSV to any writer.
///
/// A logged parameter that was absent at a step is written as an empty
/// field.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_csv(records: &[StepRecord], columns: &[String], writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(columns.iter().map(String::as_str)),
    )?;

    for r in records {
        let mut row = Vec::with_capacity(FIXED_COLUMNS.len() + r.values.len());
        row.push(r.step.to_string());
        row.push(r.time_s.to_string());
        row.push(r.distance_m.to_string());
        row.push(r.total_energy_j.to_string());
        row.extend(
            r.values
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(step: usize) -> StepRecord {
        StepRecord {
            step,
            time_s: (step + 1) as f64 * 60.0,
            distance_m: (step + 1) as f64 * 600.0,
            total_energy_j: 1.0e6 - step as f64 * 1000.0,
            net_energy_j: -1000.0,
            values: vec![Some(10.0), if step % 2 == 0 { None } else { Some(42.5) }],
        }
    }

    fn columns() -> Vec<String> {
        vec!["velocity".to_string(), "array_power".to_string()]
    }

    fn render(records: &[StepRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(records, &columns(), &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_lists_fixed_then_logged_columns() {
        let output = render(&[make_record(0)]);
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(first_line, "step,time_s,distance_m,total_energy_j,velocity,array_power");
    }

    #[test]
    fn row_count_matches_step_count() {
        let records: Vec<StepRecord> = (0..16).map(make_record).collect();
        let output = render(&records);
        // 1 header + 16 data rows
        assert_eq!(output.lines().count(), 17);
    }

    #[test]
    fn missing_value_is_empty_field() {
        let output = render(&[make_record(0), make_record(1)]);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[1].ends_with(",10,"), "got {}", lines[1]);
        assert!(lines[2].ends_with(",10,42.5"), "got {}", lines[2]);
    }

    #[test]
    fn deterministic_output() {
        let records: Vec<StepRecord> = (0..5).map(make_record).collect();
        assert_eq!(render(&records), render(&records));
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.csv");
        let records: Vec<StepRecord> = (0..3).map(make_record).collect();
        export_csv(&records, &columns(), &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.headers().unwrap().len(), 6);
        let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 3);
        let energy: f64 = rows[2][3].parse().unwrap();
        assert_eq!(energy, 998_000.0);
    }
}
