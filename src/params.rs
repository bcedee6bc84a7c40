//! Named parameter dictionary shared by the vehicle and its sub-models.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ModelError;
use crate::units::Unit;

/// A single parameter value in its stored unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Param {
    pub value: f64,
    pub unit: Unit,
}

impl Param {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// Insertion-ordered mapping from parameter name to value.
///
/// Sub-models read their inputs from here and write their outputs back, so
/// the dictionary doubles as the simulation state and the logging surface.
///
/// # Examples
///
/// ```
/// use vehicle_sim::params::Params;
/// use vehicle_sim::units::Unit;
///
/// let mut params = Params::new();
/// params.set("velocity", 9.0, Unit::MetersPerSecond);
/// params.add("distance", 9.0, Unit::Meters);
/// params.add("distance", 9.0, Unit::Meters);
/// assert_eq!(params.get("distance"), Some(18.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params {
    entries: IndexMap<String, Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).map(|p| p.value)
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Returns the value for `key` or a [`ModelError::MissingParam`] naming `model`.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent.
    pub fn require(&self, model: &'static str, key: &str) -> Result<f64, ModelError> {
        self.get(key).ok_or_else(|| ModelError::MissingParam {
            model,
            key: key.to_string(),
        })
    }

    /// Returns the full entry (value and unit) for `key`.
    pub fn param(&self, key: &str) -> Option<Param> {
        self.entries.get(key).copied()
    }

    /// Returns the unit tag for `key`.
    pub fn unit(&self, key: &str) -> Option<Unit> {
        self.entries.get(key).map(|p| p.unit)
    }

    /// Inserts or overwrites `key`. New keys go to the end.
    pub fn set(&mut self, key: &str, value: f64, unit: Unit) {
        match self.entries.get_mut(key) {
            Some(p) => *p = Param::new(value, unit),
            None => {
                self.entries.insert(key.to_string(), Param::new(value, unit));
            }
        }
    }

    /// Adds `delta` to `key`, inserting it with value `delta` when absent.
    ///
    /// The stored unit of an existing entry is kept.
    pub fn add(&mut self, key: &str, delta: f64, unit: Unit) {
        match self.entries.get_mut(key) {
            Some(p) => p.value += delta,
            None => {
                self.entries.insert(key.to_string(), Param::new(delta, unit));
            }
        }
    }

    /// Inserts `key` with `value` only when it is not already present.
    pub fn set_default(&mut self, key: &str, value: f64, unit: Unit) {
        if !self.contains(key) {
            self.set(key, value, unit);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Param> {
        self.entries.shift_remove(key)
    }

    /// Copies every entry of `overrides` into `self`, overwriting on conflict.
    pub fn merge(&mut self, overrides: &Params) {
        for (key, p) in overrides.iter() {
            self.set(key, p.value, p.unit);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Param)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Param)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Params {
    /// One `name value unit` line per entry, energy in Wh.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, p) in self.iter() {
            let value = p.value * p.unit.display_factor();
            let symbol = p.unit.display_symbol();
            if symbol.is_empty() {
                writeln!(f, "{key} {value}")?;
            } else {
                writeln!(f, "{key} {value} {symbol}")?;
            }
        }
        Ok(())
    }
}
