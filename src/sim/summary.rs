//! Post-hoc summary of a completed run.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::units::JOULES_PER_WH;

use super::types::StepRecord;

/// Cumulative energy of one sub-model over the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEnergy {
    pub model: String,
    pub energy_j: f64,
}

/// Aggregate results of a run.
///
/// Computed from the step records so the summary always agrees with the
/// exported telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    /// Simulated time (s).
    pub duration_s: f64,
    /// Distance covered (m).
    pub distance_m: f64,
    /// Mean speed over the run (m/s).
    pub average_speed_mps: f64,
    /// Stored energy before the first step (J).
    pub start_energy_j: f64,
    /// Stored energy after the last step (J).
    pub final_energy_j: f64,
    /// Lowest stored energy after any step (J).
    pub min_energy_j: f64,
    /// `final_energy_j - start_energy_j`.
    pub net_energy_j: f64,
    /// Sum of models with a positive total (J).
    pub harvested_j: f64,
    /// Sum of models with a negative total, as a positive number (J).
    pub consumed_j: f64,
    pub energy_by_model: Vec<ModelEnergy>,
    /// First step after which stored energy was at or below zero.
    pub depletion_step: Option<usize>,
    /// Final state of charge when a battery capacity is configured.
    pub final_soc: Option<f64>,
}

impl RunSummary {
    /// Builds the summary from step records and per-model energy totals.
    ///
    /// # Arguments
    ///
    /// * `records` - Every step of the run, in order
    /// * `energy_by_model` - Cumulative joules per model name
    /// * `battery_capacity_j` - Pack capacity for the final state of charge
    pub fn from_records(
        records: &[StepRecord],
        energy_by_model: &IndexMap<&'static str, f64>,
        battery_capacity_j: Option<f64>,
    ) -> Self {
        let breakdown: Vec<ModelEnergy> = energy_by_model
            .iter()
            .map(|(name, e)| ModelEnergy {
                model: (*name).to_string(),
                energy_j: *e,
            })
            .collect();
        let harvested_j: f64 = breakdown.iter().map(|m| m.energy_j.max(0.0)).sum();
        let consumed_j: f64 = breakdown.iter().map(|m| (-m.energy_j).max(0.0)).sum();

        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Self {
                steps: 0,
                duration_s: 0.0,
                distance_m: 0.0,
                average_speed_mps: 0.0,
                start_energy_j: 0.0,
                final_energy_j: 0.0,
                min_energy_j: 0.0,
                net_energy_j: 0.0,
                harvested_j,
                consumed_j,
                energy_by_model: breakdown,
                depletion_step: None,
                final_soc: None,
            };
        };

        let start_energy_j = first.total_energy_j - first.net_energy_j;
        let min_energy_j = records
            .iter()
            .map(|r| r.total_energy_j)
            .fold(f64::INFINITY, f64::min);
        let depletion_step = records
            .iter()
            .find(|r| r.total_energy_j <= 0.0)
            .map(|r| r.step);
        let average_speed_mps = if last.time_s > 0.0 {
            last.distance_m / last.time_s
        } else {
            0.0
        };
        let final_soc = battery_capacity_j
            .filter(|c| *c > 0.0)
            .map(|c| last.total_energy_j / c);

        Self {
            steps: records.len(),
            duration_s: last.time_s,
            distance_m: last.distance_m,
            average_speed_mps,
            start_energy_j,
            final_energy_j: last.total_energy_j,
            min_energy_j,
            net_energy_j: last.total_energy_j - start_energy_j,
            harvested_j,
            consumed_j,
            energy_by_model: breakdown,
            depletion_step,
            final_soc,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wh = |j: f64| j / JOULES_PER_WH;
        writeln!(f, "--- Run Summary ---")?;
        writeln!(f, "Steps:             {}", self.steps)?;
        writeln!(f, "Duration:          {:.2} h", self.duration_s / 3600.0)?;
        writeln!(f, "Distance:          {:.2} km", self.distance_m / 1000.0)?;
        writeln!(f, "Average speed:     {:.2} km/h", self.average_speed_mps * 3.6)?;
        writeln!(f, "Start energy:      {:.1} Wh", wh(self.start_energy_j))?;
        writeln!(f, "Final energy:      {:.1} Wh", wh(self.final_energy_j))?;
        writeln!(f, "Minimum energy:    {:.1} Wh", wh(self.min_energy_j))?;
        writeln!(f, "Net energy:        {:+.1} Wh", wh(self.net_energy_j))?;
        writeln!(f, "Harvested:         {:.1} Wh", wh(self.harvested_j))?;
        writeln!(f, "Consumed:          {:.1} Wh", wh(self.consumed_j))?;
        for m in &self.energy_by_model {
            writeln!(f, "  {:<18} {:+.1} Wh", m.model, wh(m.energy_j))?;
        }
        if let Some(soc) = self.final_soc {
            writeln!(f, "Final SoC:         {:.1}%", soc * 100.0)?;
        }
        match self.depletion_step {
            Some(step) => write!(f, "Battery depleted:  step {step}"),
            None => write!(f, "Battery depleted:  no"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: usize, total_energy_j: f64, net_energy_j: f64) -> StepRecord {
        StepRecord {
            step,
            time_s: (step + 1) as f64 * 100.0,
            distance_m: (step + 1) as f64 * 1000.0,
            total_energy_j,
            net_energy_j,
            values: vec![],
        }
    }

    fn tally() -> IndexMap<&'static str, f64> {
        IndexMap::from([("array", 500.0), ("drag", -900.0), ("rolling_resistance", -300.0)])
    }

    #[test]
    fn empty_records_yield_zeros() {
        let s = RunSummary::from_records(&[], &IndexMap::new(), Some(100.0));
        assert_eq!(s.steps, 0);
        assert_eq!(s.distance_m, 0.0);
        assert_eq!(s.depletion_step, None);
        assert_eq!(s.final_soc, None);
    }

    #[test]
    fn energy_figures_from_records() {
        let records = vec![record(0, 1000.0, -200.0), record(1, 600.0, -400.0)];
        let s = RunSummary::from_records(&records, &tally(), Some(2400.0));
        assert_eq!(s.steps, 2);
        assert_eq!(s.start_energy_j, 1200.0);
        assert_eq!(s.final_energy_j, 600.0);
        assert_eq!(s.min_energy_j, 600.0);
        assert_eq!(s.net_energy_j, -600.0);
        assert_eq!(s.harvested_j, 500.0);
        assert_eq!(s.consumed_j, 1200.0);
        assert_eq!(s.final_soc, Some(0.25));
        assert_eq!(s.average_speed_mps, 10.0);
    }

    #[test]
    fn depletion_is_first_non_positive_step() {
        let records = vec![
            record(0, 100.0, -50.0),
            record(1, -10.0, -110.0),
            record(2, -50.0, -40.0),
        ];
        let s = RunSummary::from_records(&records, &tally(), None);
        assert_eq!(s.depletion_step, Some(1));
        assert_eq!(s.min_energy_j, -50.0);
    }

    #[test]
    fn display_lists_models() {
        let records = vec![record(0, 1000.0, -200.0)];
        let text = RunSummary::from_records(&records, &tally(), None).to_string();
        assert!(text.contains("Run Summary"));
        assert!(text.contains("rolling_resistance"));
        assert!(text.contains("Battery depleted:  no"));
    }
}
