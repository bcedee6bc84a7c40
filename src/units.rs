//! Physical units for parameter values.
//!
//! Every parameter is stored in SI (with a few race-engineering exceptions
//! such as `rpm`, `degC` and `%`). Configuration files may spell values as
//! `"<number> <unit>"`; [`parse_quantity`] converts them to the stored unit.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Joules per watt-hour.
pub const JOULES_PER_WH: f64 = 3600.0;

/// Dimension tag attached to every stored parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    Dimensionless,
    Percent,
    Seconds,
    Meters,
    SquareMeters,
    MetersPerSecond,
    MetersPerSecondSquared,
    SecondsPerMeter,
    PerMeter,
    Kilograms,
    KilogramsPerCubicMeter,
    Newtons,
    NewtonMeters,
    Watts,
    Joules,
    Volts,
    Amperes,
    Ohms,
    Radians,
    Rpm,
    Celsius,
    MillimetersPerHour,
    WattsPerRpm,
    WattsPerRpm2,
    WattsPerRpm3,
    NewtonMetersPerAmpere,
}

impl Unit {
    /// Symbol of the stored (SI) unit.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Dimensionless => "",
            Self::Percent => "%",
            Self::Seconds => "s",
            Self::Meters => "m",
            Self::SquareMeters => "m^2",
            Self::MetersPerSecond => "m/s",
            Self::MetersPerSecondSquared => "m/s^2",
            Self::SecondsPerMeter => "s/m",
            Self::PerMeter => "1/m",
            Self::Kilograms => "kg",
            Self::KilogramsPerCubicMeter => "kg/m^3",
            Self::Newtons => "N",
            Self::NewtonMeters => "N*m",
            Self::Watts => "W",
            Self::Joules => "J",
            Self::Volts => "V",
            Self::Amperes => "A",
            Self::Ohms => "ohm",
            Self::Radians => "rad",
            Self::Rpm => "rpm",
            Self::Celsius => "degC",
            Self::MillimetersPerHour => "mm/h",
            Self::WattsPerRpm => "W/rpm",
            Self::WattsPerRpm2 => "W/rpm^2",
            Self::WattsPerRpm3 => "W/rpm^3",
            Self::NewtonMetersPerAmpere => "N*m/A",
        }
    }

    /// Symbol used in human-facing reports. Energy is reported in Wh.
    pub fn display_symbol(self) -> &'static str {
        match self {
            Self::Joules => "Wh",
            other => other.symbol(),
        }
    }

    /// Multiplier taking a stored value to its display unit.
    pub fn display_factor(self) -> f64 {
        match self {
            Self::Joules => 1.0 / JOULES_PER_WH,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Failure to interpret a `"<number> <unit>"` string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[error("unknown unit \"{0}\"")]
    UnknownUnit(String),
}

/// Looks up a unit spelling and returns `(scale to stored unit, stored unit)`.
fn lookup(spelling: &str) -> Option<(f64, Unit)> {
    let entry = match spelling {
        "" | "dimensionless" => (1.0, Unit::Dimensionless),
        "%" | "percent" => (1.0, Unit::Percent),

        "s" | "sec" | "second" | "seconds" => (1.0, Unit::Seconds),
        "min" | "minute" | "minutes" => (60.0, Unit::Seconds),
        "h" | "hr" | "hour" | "hours" => (3600.0, Unit::Seconds),

        "m" | "meter" | "meters" => (1.0, Unit::Meters),
        "mm" | "millimeter" | "millimeters" => (1e-3, Unit::Meters),
        "km" | "kilometer" | "kilometers" => (1e3, Unit::Meters),
        "in" | "inch" | "inches" => (0.0254, Unit::Meters),
        "ft" | "foot" | "feet" => (0.3048, Unit::Meters),
        "mi" | "mile" | "miles" => (1609.344, Unit::Meters),

        "m^2" | "m2" | "meter**2" => (1.0, Unit::SquareMeters),
        "mm^2" | "mm2" => (1e-6, Unit::SquareMeters),

        "m/s" | "mps" => (1.0, Unit::MetersPerSecond),
        "mph" => (0.44704, Unit::MetersPerSecond),
        "km/h" | "kph" | "kmh" => (1.0 / 3.6, Unit::MetersPerSecond),
        "m/s^2" | "m/s2" => (1.0, Unit::MetersPerSecondSquared),

        "s/m" => (1.0, Unit::SecondsPerMeter),
        "h/km" | "hour/kilometer" => (3.6, Unit::SecondsPerMeter),
        "1/m" | "m^-1" => (1.0, Unit::PerMeter),

        "kg" | "kilogram" | "kilograms" => (1.0, Unit::Kilograms),
        "g" | "gram" | "grams" => (1e-3, Unit::Kilograms),
        "lb" | "lbs" | "pound" | "pounds" => (0.453_592_37, Unit::Kilograms),
        "kg/m^3" | "kg/m3" => (1.0, Unit::KilogramsPerCubicMeter),

        "N" | "newton" | "newtons" => (1.0, Unit::Newtons),
        "lbf" | "force_pound" => (4.448_221_615_260_5, Unit::Newtons),
        "N*m" | "Nm" | "N m" => (1.0, Unit::NewtonMeters),
        "N*m/A" | "Nm/A" => (1.0, Unit::NewtonMetersPerAmpere),

        "W" | "watt" | "watts" => (1.0, Unit::Watts),
        "kW" | "kilowatt" | "kilowatts" => (1e3, Unit::Watts),
        "J" | "joule" | "joules" => (1.0, Unit::Joules),
        "kJ" => (1e3, Unit::Joules),
        "MJ" => (1e6, Unit::Joules),
        "Wh" | "watt_hour" => (JOULES_PER_WH, Unit::Joules),
        "kWh" | "kilowatt_hour" => (1e3 * JOULES_PER_WH, Unit::Joules),

        "V" | "volt" | "volts" => (1.0, Unit::Volts),
        "A" | "amp" | "amps" | "ampere" | "amperes" => (1.0, Unit::Amperes),
        "mA" => (1e-3, Unit::Amperes),
        "ohm" | "ohms" | "Ω" => (1.0, Unit::Ohms),
        "mohm" | "mΩ" => (1e-3, Unit::Ohms),

        "rad" | "radian" | "radians" => (1.0, Unit::Radians),
        "deg" | "degree" | "degrees" => (PI / 180.0, Unit::Radians),
        "rpm" => (1.0, Unit::Rpm),
        "rad/s" => (60.0 / (2.0 * PI), Unit::Rpm),

        "degC" | "°C" | "celsius" => (1.0, Unit::Celsius),
        "mm/h" | "mm/hr" => (1.0, Unit::MillimetersPerHour),

        "W/rpm" => (1.0, Unit::WattsPerRpm),
        "W/rpm^2" => (1.0, Unit::WattsPerRpm2),
        "W/rpm^3" => (1.0, Unit::WattsPerRpm3),
        _ => return None,
    };
    Some(entry)
}

/// Parses `"<number> [unit]"` into a value in the stored unit.
///
/// The number and the unit are separated by whitespace. A bare number is
/// dimensionless.
///
/// # Errors
///
/// Returns [`UnitError`] if the number does not parse or the unit is unknown.
///
/// # Examples
///
/// ```
/// use vehicle_sim::units::{Unit, parse_quantity};
///
/// let (v, unit) = parse_quantity("36 km/h").unwrap();
/// assert!((v - 10.0).abs() < 1e-9);
/// assert_eq!(unit, Unit::MetersPerSecond);
/// ```
pub fn parse_quantity(text: &str) -> Result<(f64, Unit), UnitError> {
    let text = text.trim();
    let (number, unit) = match text.split_once(char::is_whitespace) {
        Some((number, unit)) => (number, unit.trim()),
        None => (text, ""),
    };
    let value: f64 = number
        .parse()
        .map_err(|_| UnitError::NotANumber(number.to_string()))?;
    let (scale, unit) = lookup(unit).ok_or_else(|| UnitError::UnknownUnit(unit.to_string()))?;
    Ok((value * scale, unit))
}
