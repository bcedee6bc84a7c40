//! Hourly weather tables loaded from CSV.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::models::weather::WeatherConditions;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One row of a weather CSV.
///
/// Expected columns: `hour,temperature,cloud_cover,wind_speed,wind_direction,precipitation`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WeatherRow {
    /// Hours since local midnight.
    pub hour: f64,
    /// Ambient temperature (°C).
    pub temperature: f64,
    /// Cloud cover (%).
    pub cloud_cover: f64,
    /// Wind speed (m/s).
    pub wind_speed: f64,
    /// Direction the wind blows from (deg).
    pub wind_direction: f64,
    /// Precipitation rate (mm/h).
    pub precipitation: f64,
}

impl From<WeatherRow> for WeatherConditions {
    fn from(row: WeatherRow) -> Self {
        Self {
            temperature: row.temperature,
            cloud_cover: row.cloud_cover,
            wind_speed: row.wind_speed,
            wind_direction: row.wind_direction,
            precipitation: row.precipitation,
        }
    }
}

/// Weather observations or forecasts sorted by hour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    rows: Vec<WeatherRow>,
}

impl WeatherTable {
    pub fn new(mut rows: Vec<WeatherRow>) -> Self {
        rows.sort_by(|a, b| a.hour.total_cmp(&b.hour));
        Self { rows }
    }

    /// Reads a table from CSV data with a header row.
    ///
    /// # Errors
    ///
    /// Returns a `csv::Error` if a row is malformed or a field is not numeric.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let rows = rdr.deserialize().collect::<Result<Vec<WeatherRow>, _>>()?;
        Ok(Self::new(rows))
    }

    /// Reads a table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns a `csv::Error` if the file cannot be opened or parsed.
    pub fn from_csv_path(path: &Path) -> Result<Self, csv::Error> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let rows = rdr
            .into_deserialize()
            .collect::<Result<Vec<WeatherRow>, _>>()?;
        Ok(Self::new(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[WeatherRow] {
        &self.rows
    }

    /// Conditions of the row nearest to `time_s` (seconds since midnight).
    ///
    /// Times past midnight wrap onto the same table, so a multi-day run
    /// repeats the day. Ties go to the earlier row. An empty table yields the default
    /// conditions.
    pub fn at(&self, time_s: f64) -> WeatherConditions {
        let hour = time_s.rem_euclid(SECONDS_PER_DAY) / 3600.0;
        self.rows
            .iter()
            .min_by(|a, b| (a.hour - hour).abs().total_cmp(&(b.hour - hour).abs()))
            .map_or_else(WeatherConditions::default, |row| (*row).into())
    }
}
